//! Read-only access to `.d64` disk images.
//!
//! A D64 file is a raw dump of a 1541 disk: 35 (or 40) tracks with a
//! varying number of 256-byte sectors, optionally followed by one error
//! byte per sector. Track 18 holds the BAM and the directory chain.

use crate::core::charset::Encoding;
use crate::domain::model::{FileType, ProgramFile};
use crate::domain::ports::{DiskImage, DiskImageReader};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub const SECTOR_SIZE: usize = 256;

/// 35 tracks, 683 sectors.
pub const D64_SIZE: usize = 174_848;
pub const D64_SIZE_WITH_ERRORS: usize = 175_531;
/// 40 tracks, 768 sectors.
pub const D64_40_SIZE: usize = 196_608;
pub const D64_40_SIZE_WITH_ERRORS: usize = 197_376;

pub const DIRECTORY_TRACK: u8 = 18;
pub const DIRECTORY_FIRST_SECTOR: u8 = 1;
pub const BAM_SECTOR: u8 = 0;

const ENTRIES_PER_SECTOR: usize = 8;
const ENTRY_SIZE: usize = 32;
const NAME_LEN: usize = 16;
const PADDING: u8 = 0xA0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum D64Error {
    #[error("invalid D64 size: {got} bytes")]
    InvalidSize { got: usize },

    #[error("invalid track {0}")]
    InvalidTrack(u8),

    #[error("invalid sector {sector} on track {track}")]
    InvalidSector { track: u8, sector: u8 },

    #[error("sector chain loops back to track {track}, sector {sector}")]
    CircularChain { track: u8, sector: u8 },
}

pub fn sectors_in_track(track: u8) -> std::result::Result<u8, D64Error> {
    match track {
        1..=17 => Ok(21),
        18..=24 => Ok(19),
        25..=30 => Ok(18),
        31..=40 => Ok(17),
        _ => Err(D64Error::InvalidTrack(track)),
    }
}

/// One raw directory slot with a nonzero file type.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    pub raw_name: Vec<u8>,
    pub file_type: FileType,
    pub closed: bool,
    pub locked: bool,
    pub first_track: u8,
    pub first_sector: u8,
    pub blocks: u16,
}

impl DirEntry {
    fn parse(slot: &[u8]) -> Option<Self> {
        let type_byte = slot[2];
        if type_byte == 0 {
            return None;
        }

        let name = &slot[5..5 + NAME_LEN];
        let end = name
            .iter()
            .rposition(|&b| b != PADDING)
            .map_or(0, |i| i + 1);

        Some(Self {
            raw_name: name[..end].to_vec(),
            file_type: FileType::from_type_byte(type_byte),
            closed: type_byte & 0x80 != 0,
            locked: type_byte & 0x40 != 0,
            first_track: slot[3],
            first_sector: slot[4],
            blocks: u16::from_le_bytes([slot[0x1E], slot[0x1F]]),
        })
    }

    pub fn name(&self) -> String {
        Encoding::Petscii.decode(&self.raw_name)
    }

    /// The entry as printed by `LOAD"$",8`.
    pub fn listing_line(&self) -> String {
        let name = self.name();
        let pad = NAME_LEN.saturating_sub(name.chars().count());
        format!(
            "{:<5}\"{}\"{}{}{}{}",
            self.blocks,
            name,
            " ".repeat(pad),
            if self.closed { ' ' } else { '*' },
            self.file_type.label(),
            if self.locked { "<" } else { "" }
        )
    }
}

#[derive(Clone)]
pub struct D64Image {
    data: Box<[u8]>,
    tracks: u8,
}

impl std::fmt::Debug for D64Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("D64Image")
            .field("size", &self.data.len())
            .field("tracks", &self.tracks)
            .finish()
    }
}

impl D64Image {
    pub fn from_bytes(data: Vec<u8>) -> std::result::Result<Self, D64Error> {
        let tracks = match data.len() {
            D64_SIZE | D64_SIZE_WITH_ERRORS => 35,
            D64_40_SIZE | D64_40_SIZE_WITH_ERRORS => 40,
            got => return Err(D64Error::InvalidSize { got }),
        };
        Ok(Self {
            data: data.into_boxed_slice(),
            tracks,
        })
    }

    pub fn tracks(&self) -> u8 {
        self.tracks
    }

    fn sector_offset(&self, track: u8, sector: u8) -> std::result::Result<usize, D64Error> {
        if track == 0 || track > self.tracks {
            return Err(D64Error::InvalidTrack(track));
        }
        if sector >= sectors_in_track(track)? {
            return Err(D64Error::InvalidSector { track, sector });
        }
        let preceding: usize = (1..track)
            .map(|t| sectors_in_track(t).map(usize::from))
            .sum::<std::result::Result<usize, D64Error>>()?;
        Ok((preceding + sector as usize) * SECTOR_SIZE)
    }

    pub fn read_sector(&self, track: u8, sector: u8) -> std::result::Result<&[u8], D64Error> {
        let offset = self.sector_offset(track, sector)?;
        Ok(&self.data[offset..offset + SECTOR_SIZE])
    }

    pub fn read_bam(&self) -> std::result::Result<&[u8], D64Error> {
        self.read_sector(DIRECTORY_TRACK, BAM_SECTOR)
    }

    pub fn disk_name(&self) -> std::result::Result<String, D64Error> {
        let bam = self.read_bam()?;
        let name = &bam[0x90..0xA0];
        let end = name
            .iter()
            .rposition(|&b| b != PADDING)
            .map_or(0, |i| i + 1);
        Ok(Encoding::Petscii.decode(&name[..end]))
    }

    /// Disk ID and DOS type as shown in the listing header, e.g. `01 2A`.
    pub fn disk_id(&self) -> std::result::Result<String, D64Error> {
        let bam = self.read_bam()?;
        let id: String = bam[0xA2..0xA7]
            .iter()
            .map(|&b| match b {
                PADDING => ' ',
                b => Encoding::Petscii.decode_byte(b),
            })
            .collect();
        Ok(id)
    }

    /// Free blocks counted from the BAM, directory track excluded.
    pub fn free_blocks(&self) -> std::result::Result<u16, D64Error> {
        let bam = self.read_bam()?;
        let free = (1..=35u8)
            .filter(|&t| t != DIRECTORY_TRACK)
            .map(|t| u16::from(bam[4 + 4 * (t as usize - 1)]))
            .sum();
        Ok(free)
    }

    /// Walk a track/sector chain, returning every visited sector.
    fn chain(&self, track: u8, sector: u8) -> std::result::Result<Vec<&[u8]>, D64Error> {
        let mut visited = HashSet::new();
        let mut sectors = Vec::new();
        let (mut track, mut sector) = (track, sector);

        while track != 0 {
            if !visited.insert((track, sector)) {
                return Err(D64Error::CircularChain { track, sector });
            }
            let data = self.read_sector(track, sector)?;
            sectors.push(data);
            track = data[0];
            sector = data[1];
        }

        Ok(sectors)
    }

    pub fn entries(&self) -> std::result::Result<Vec<DirEntry>, D64Error> {
        let sectors = self.chain(DIRECTORY_TRACK, DIRECTORY_FIRST_SECTOR)?;
        let entries = sectors
            .into_iter()
            .flat_map(|sector| sector.chunks_exact(ENTRY_SIZE).take(ENTRIES_PER_SECTOR))
            .filter_map(DirEntry::parse)
            .collect();
        Ok(entries)
    }

    /// File data following the chain from `(track, sector)`.
    ///
    /// In the last sector the second link byte is the index of the last
    /// used byte.
    pub fn read_file(&self, track: u8, sector: u8) -> std::result::Result<Vec<u8>, D64Error> {
        let sectors = self.chain(track, sector)?;
        let mut content = Vec::with_capacity(sectors.len() * (SECTOR_SIZE - 2));
        for data in sectors {
            if data[0] == 0 {
                let last = data[1] as usize;
                if last >= 2 {
                    content.extend_from_slice(&data[2..=last]);
                }
            } else {
                content.extend_from_slice(&data[2..]);
            }
        }
        Ok(content)
    }
}

/// `*` matches any run of bytes, `?` exactly one byte.
pub fn name_matches(pattern: &[u8], name: &[u8]) -> bool {
    let (mut p, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some(b'*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == b'?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    n = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}

impl DiskImage for D64Image {
    fn directory(&self) -> Result<Vec<String>> {
        let mut lines = vec![format!(
            "0 \"{:<16}\" {}",
            self.disk_name()?,
            self.disk_id()?
        )];
        lines.extend(self.entries()?.iter().map(DirEntry::listing_line));
        lines.push(format!("{} BLOCKS FREE.", self.free_blocks()?));
        Ok(lines)
    }

    fn glob(&self, pattern: &[u8]) -> Result<Vec<ProgramFile>> {
        let files = self
            .entries()?
            .into_iter()
            .filter(|entry| name_matches(pattern, &entry.raw_name))
            .map(|entry| {
                let content = match self.read_file(entry.first_track, entry.first_sector) {
                    Ok(content) => Some(content),
                    Err(e) => {
                        tracing::debug!("Unreadable file \"{}\": {}", entry.name(), e);
                        None
                    }
                };
                ProgramFile {
                    name: entry.name(),
                    raw_name: entry.raw_name,
                    file_type: entry.file_type,
                    blocks: entry.blocks,
                    content,
                }
            })
            .collect();
        Ok(files)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct D64Reader;

impl DiskImageReader for D64Reader {
    type Image = D64Image;

    fn open(&self, path: &Path) -> Result<D64Image> {
        let data = std::fs::read(path)?;
        Ok(D64Image::from_bytes(data)?)
    }
}
