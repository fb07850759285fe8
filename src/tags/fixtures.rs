//! Smallest well-formed MP3, FLAC, Ogg Vorbis and Opus files lofty will
//! parse, built in memory for tag round-trip tests.

use std::path::{Path, PathBuf};

/// MPEG-1 Layer III, 128 kbit/s, 44.1 kHz, stereo, no CRC, no padding.
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
/// 144 * 128000 / 44100
const MPEG_FRAME_LEN: usize = 417;

const OGG_SERIAL: u32 = 0x5EED;

pub fn mp3() -> Vec<u8> {
    let mut frame = vec![0u8; MPEG_FRAME_LEN];
    frame[..4].copy_from_slice(&MPEG_FRAME_HEADER);
    frame.repeat(8)
}

/// Vendor string, comment count and `KEY=value` entries, as shared by FLAC
/// blocks and Ogg comment packets.
fn comment_body(comments: &[(&str, &str)]) -> Vec<u8> {
    let vendor = b"fixture";
    let mut out = (vendor.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(vendor);
    out.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for (key, value) in comments {
        let field = format!("{key}={value}");
        out.extend_from_slice(&(field.len() as u32).to_le_bytes());
        out.extend_from_slice(field.as_bytes());
    }
    out
}

fn flac_block(kind: u8, last: bool, body: &[u8]) -> Vec<u8> {
    let mut out = vec![if last { kind | 0x80 } else { kind }];
    out.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
    out.extend_from_slice(body);
    out
}

fn flac_streaminfo() -> Vec<u8> {
    let mut body = Vec::with_capacity(34);
    body.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    body.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    body.extend_from_slice(&[0; 6]); // frame sizes unknown
    // 44.1 kHz, 2 channels, 16 bits, 0 samples
    let packed: u64 = (44_100 << 44) | (1 << 41) | (15 << 36);
    body.extend_from_slice(&packed.to_be_bytes());
    body.extend_from_slice(&[0; 16]); // MD5
    body
}

/// FLAC with optional comment block and trailing PADDING.
pub fn flac(comments: Option<&[(&str, &str)]>, padding: bool) -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    out.extend(flac_block(0, comments.is_none() && !padding, &flac_streaminfo()));
    if let Some(comments) = comments {
        out.extend(flac_block(4, !padding, &comment_body(comments)));
    }
    if padding {
        out.extend(flac_block(1, true, &[0; 1024]));
    }
    out
}

/// Ogg page checksum: CRC-32, polynomial 0x04C11DB7, no reflection, zero init.
fn ogg_crc(page: &[u8]) -> u32 {
    let mut crc = 0u32;
    for &byte in page {
        crc ^= u32::from(byte) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ 0x04C1_1DB7
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// One Ogg page holding whole packets (each under 255 bytes here, but the
/// lacing handles longer ones).
fn ogg_page(header_type: u8, granule: u64, sequence: u32, packets: &[&[u8]]) -> Vec<u8> {
    let mut lacing = Vec::new();
    for packet in packets {
        let mut len = packet.len();
        while len >= 255 {
            lacing.push(255);
            len -= 255;
        }
        lacing.push(len as u8);
    }

    let mut page = b"OggS".to_vec();
    page.push(0); // version
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&OGG_SERIAL.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0; 4]); // checksum, filled below
    page.push(lacing.len() as u8);
    page.extend_from_slice(&lacing);
    for packet in packets {
        page.extend_from_slice(packet);
    }

    let crc = ogg_crc(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

const OGG_BOS: u8 = 0x02;
const OGG_EOS: u8 = 0x04;

pub fn ogg_vorbis(comments: &[(&str, &str)]) -> Vec<u8> {
    let mut ident = vec![1];
    ident.extend_from_slice(b"vorbis");
    ident.extend_from_slice(&0u32.to_le_bytes()); // version
    ident.push(2); // channels
    ident.extend_from_slice(&44_100u32.to_le_bytes());
    ident.extend_from_slice(&0i32.to_le_bytes()); // bitrate max
    ident.extend_from_slice(&128_000i32.to_le_bytes()); // bitrate nominal
    ident.extend_from_slice(&0i32.to_le_bytes()); // bitrate min
    ident.push(0xB8); // block sizes 256 / 2048
    ident.push(1); // framing

    let mut comment = vec![3];
    comment.extend_from_slice(b"vorbis");
    comment.extend(comment_body(comments));
    comment.push(1); // framing

    let mut setup = vec![5];
    setup.extend_from_slice(b"vorbis");
    setup.extend_from_slice(&[0; 8]);

    let mut out = ogg_page(OGG_BOS, 0, 0, &[ident.as_slice()]);
    out.extend(ogg_page(0, 0, 1, &[comment.as_slice(), setup.as_slice()]));
    out.extend(ogg_page(OGG_EOS, 44_100, 2, &[&[0u8; 16][..]]));
    out
}

pub fn opus(comments: &[(&str, &str)]) -> Vec<u8> {
    let mut head = b"OpusHead".to_vec();
    head.push(1); // version
    head.push(2); // channels
    head.extend_from_slice(&312u16.to_le_bytes()); // pre-skip
    head.extend_from_slice(&48_000u32.to_le_bytes());
    head.extend_from_slice(&0i16.to_le_bytes()); // output gain
    head.push(0); // mapping family

    let mut tags = b"OpusTags".to_vec();
    tags.extend(comment_body(comments));

    let mut out = ogg_page(OGG_BOS, 0, 0, &[head.as_slice()]);
    out.extend(ogg_page(0, 0, 1, &[tags.as_slice()]));
    out.extend(ogg_page(OGG_EOS, 48_312, 2, &[&[0xF8u8, 0xFF, 0xFE][..]]));
    out
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
