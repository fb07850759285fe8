use crate::rating::Rating;

/// Which direction(s) ratings may flow in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Both ways; Plex wins conflicts.
    Sync,
    /// Files → Plex.
    Import,
    /// Plex → files.
    Export,
}

impl SyncMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sync => "Synchronization",
            Self::Import => "Import",
            Self::Export => "Export",
        }
    }

    pub fn direction(self) -> &'static str {
        match self {
            Self::Sync => "Plex <-> Audio Files",
            Self::Import => "Audio Files -> Plex",
            Self::Export => "Plex -> Audio Files",
        }
    }
}

/// What to do with one track once both ratings are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Copy the file's rating into Plex.
    WriteCatalog(Rating),
    /// Copy the Plex rating into the file.
    WriteFile(Rating),
    /// Both sides already agree.
    AlreadyMatching,
    /// The side we would copy from has no rating.
    NothingToCopy,
}

/// Decide per mode. On a `Sync` conflict Plex always wins.
pub fn decide(mode: SyncMode, catalog: Option<Rating>, file: Option<Rating>) -> Decision {
    match mode {
        SyncMode::Import => match file {
            Some(f) if catalog != Some(f) => Decision::WriteCatalog(f),
            Some(_) => Decision::AlreadyMatching,
            None => Decision::NothingToCopy,
        },
        SyncMode::Export => match catalog {
            Some(c) if file != Some(c) => Decision::WriteFile(c),
            Some(_) => Decision::AlreadyMatching,
            None => Decision::NothingToCopy,
        },
        SyncMode::Sync => match (catalog, file) {
            (Some(c), Some(f)) if c == f => Decision::AlreadyMatching,
            (Some(c), _) => Decision::WriteFile(c),
            (None, Some(f)) => Decision::WriteCatalog(f),
            (None, None) => Decision::NothingToCopy,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [SyncMode; 3] = [SyncMode::Sync, SyncMode::Import, SyncMode::Export];

    fn r(value: u8) -> Option<Rating> {
        Rating::new(value)
    }

    /// Every (catalog, file) combination including unrated.
    fn all_pairs() -> Vec<(Option<Rating>, Option<Rating>)> {
        let values: Vec<Option<Rating>> = std::iter::once(None)
            .chain((Rating::MIN..=Rating::MAX).map(Rating::new))
            .collect();
        values
            .iter()
            .flat_map(|c| values.iter().map(move |f| (*c, *f)))
            .collect()
    }

    #[test]
    fn test_import_table() {
        assert_eq!(decide(SyncMode::Import, r(4), r(8)), Decision::WriteCatalog(r(8).unwrap()));
        assert_eq!(decide(SyncMode::Import, None, r(8)), Decision::WriteCatalog(r(8).unwrap()));
        assert_eq!(decide(SyncMode::Import, r(8), r(8)), Decision::AlreadyMatching);
        assert_eq!(decide(SyncMode::Import, r(8), None), Decision::NothingToCopy);
        assert_eq!(decide(SyncMode::Import, None, None), Decision::NothingToCopy);
    }

    #[test]
    fn test_export_table() {
        assert_eq!(decide(SyncMode::Export, r(4), r(8)), Decision::WriteFile(r(4).unwrap()));
        assert_eq!(decide(SyncMode::Export, r(4), None), Decision::WriteFile(r(4).unwrap()));
        assert_eq!(decide(SyncMode::Export, r(4), r(4)), Decision::AlreadyMatching);
        assert_eq!(decide(SyncMode::Export, None, r(4)), Decision::NothingToCopy);
        assert_eq!(decide(SyncMode::Export, None, None), Decision::NothingToCopy);
    }

    #[test]
    fn test_sync_table() {
        assert_eq!(decide(SyncMode::Sync, r(7), r(8)), Decision::WriteFile(r(7).unwrap()));
        assert_eq!(decide(SyncMode::Sync, r(7), None), Decision::WriteFile(r(7).unwrap()));
        assert_eq!(decide(SyncMode::Sync, None, r(8)), Decision::WriteCatalog(r(8).unwrap()));
        assert_eq!(decide(SyncMode::Sync, r(7), r(7)), Decision::AlreadyMatching);
        assert_eq!(decide(SyncMode::Sync, None, None), Decision::NothingToCopy);
    }

    #[test]
    fn test_import_never_writes_files_export_never_writes_catalog() {
        for (catalog, file) in all_pairs() {
            assert!(!matches!(decide(SyncMode::Import, catalog, file), Decision::WriteFile(_)));
            assert!(!matches!(decide(SyncMode::Export, catalog, file), Decision::WriteCatalog(_)));
        }
    }

    #[test]
    fn test_sync_never_copies_absence() {
        for (catalog, file) in all_pairs() {
            match decide(SyncMode::Sync, catalog, file) {
                Decision::WriteCatalog(rating) => {
                    assert_eq!(catalog, None);
                    assert_eq!(file, Some(rating));
                }
                Decision::WriteFile(rating) => assert_eq!(catalog, Some(rating)),
                Decision::AlreadyMatching => assert_eq!(catalog, file),
                Decision::NothingToCopy => assert_eq!((catalog, file), (None, None)),
            }
        }
    }

    #[test]
    fn test_writes_only_when_sides_differ() {
        for mode in MODES {
            for (catalog, file) in all_pairs() {
                let decision = decide(mode, catalog, file);
                if catalog == file {
                    assert!(
                        matches!(decision, Decision::AlreadyMatching | Decision::NothingToCopy),
                        "{mode:?} {catalog:?} {file:?} -> {decision:?}"
                    );
                }
            }
        }
    }
}
