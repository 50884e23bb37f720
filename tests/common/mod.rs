#![allow(dead_code)]

use diskmag_text::core::{ConfigProvider, OutputNaming};
use std::io::Write;
use std::path::Path;

pub const D64_SIZE: usize = 174_848;

fn sectors_in_track(track: u8) -> u8 {
    match track {
        1..=17 => 21,
        18..=24 => 19,
        25..=30 => 18,
        _ => 17,
    }
}

fn offset(track: u8, sector: u8) -> usize {
    let preceding: usize = (1..track).map(|t| sectors_in_track(t) as usize).sum();
    (preceding + sector as usize) * 256
}

/// Writes a minimal but well-formed 35 track D64 image.
pub struct DiskBuilder {
    data: Vec<u8>,
    next: (u8, u8),
    slot: usize,
}

impl DiskBuilder {
    pub fn new(name: &[u8]) -> Self {
        let mut data = vec![0u8; D64_SIZE];
        let bam = offset(18, 0);
        data[bam] = 18;
        data[bam + 1] = 1;
        data[bam + 2] = 0x41;
        data[bam + 0x90..bam + 0xAB].fill(0xA0);
        data[bam + 0x90..bam + 0x90 + name.len()].copy_from_slice(name);
        data[bam + 0xA2..bam + 0xA4].copy_from_slice(b"42");
        data[bam + 0xA5..bam + 0xA7].copy_from_slice(b"2A");
        let dir = offset(18, 1);
        data[dir + 1] = 0xFF;

        Self {
            data,
            next: (1, 0),
            slot: 0,
        }
    }

    fn allocate(&mut self) -> (u8, u8) {
        let current = self.next;
        let (mut track, mut sector) = (current.0, current.1 + 1);
        if sector >= sectors_in_track(track) {
            track += 1;
            sector = 0;
            if track == 18 {
                track = 19;
            }
        }
        self.next = (track, sector);
        current
    }

    pub fn file(mut self, type_byte: u8, name: &[u8], content: &[u8]) -> Self {
        assert!(self.slot < 8, "one directory sector only");

        let chunks: Vec<&[u8]> = if content.is_empty() {
            vec![&[][..]]
        } else {
            content.chunks(254).collect()
        };
        let sectors: Vec<(u8, u8)> = chunks.iter().map(|_| self.allocate()).collect();

        for (i, chunk) in chunks.iter().enumerate() {
            let at = offset(sectors[i].0, sectors[i].1);
            let link = match sectors.get(i + 1) {
                Some(&next) => next,
                None => (0, chunk.len() as u8 + 1),
            };
            self.data[at] = link.0;
            self.data[at + 1] = link.1;
            self.data[at + 2..at + 2 + chunk.len()].copy_from_slice(chunk);
        }

        let entry = offset(18, 1) + self.slot * 32;
        self.data[entry + 2] = type_byte;
        self.data[entry + 3] = sectors[0].0;
        self.data[entry + 4] = sectors[0].1;
        self.data[entry + 5..entry + 21].fill(0xA0);
        self.data[entry + 5..entry + 5 + name.len()].copy_from_slice(name);
        self.data[entry + 0x1E] = sectors.len() as u8;
        self.slot += 1;
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// Encode text the way the C64 stores it in lowercase mode.
pub fn petscii(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            'a'..='z' => c.to_ascii_uppercase() as u8,
            'A'..='Z' => c as u8 + 0x80,
            '\n' => 0x0D,
            c => c as u8,
        })
        .collect()
}

pub fn pseudo_random(len: usize) -> Vec<u8> {
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed >> 32) as u8
        })
        .collect()
}

pub const MACHINE_CODE: [u8; 6] = [0xA9, 0x00, 0x8D, 0x20, 0xD0, 0x60];

pub fn sample_disk(text: &str) -> Vec<u8> {
    DiskBuilder::new(b"MAGAZIN")
        .file(0x81, b"ARTIKEL", &petscii(text))
        .file(0x82, b"INTRO", &MACHINE_CODE)
        .file(0x82, b"PACKED", &pseudo_random(2000))
        .file(0x80, b"OLD", b"")
        .build()
}

pub fn write_zip(path: &Path, name: &str, data: &[u8]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file(name, zip::write::SimpleFileOptions::default()).unwrap();
    zip.write_all(data).unwrap();
    zip.finish().unwrap();
}

pub struct TestConfig {
    pub corpus_path: String,
    pub output_path: Option<String>,
    pub metadata_path: String,
    pub char_threshold: f64,
    pub line_length: usize,
    pub image_extensions: Vec<String>,
    pub unpack: bool,
    pub remove_zip: bool,
    pub save_file_list: bool,
    pub fix_umlauts: bool,
    pub output_naming: OutputNaming,
}

impl TestConfig {
    pub fn new(corpus_path: &Path, metadata_path: &Path) -> Self {
        Self {
            corpus_path: corpus_path.to_str().unwrap().to_string(),
            output_path: None,
            metadata_path: metadata_path.to_str().unwrap().to_string(),
            char_threshold: 0.5,
            line_length: 80,
            image_extensions: vec!["d64".to_string()],
            unpack: true,
            remove_zip: false,
            save_file_list: false,
            fix_umlauts: false,
            output_naming: OutputNaming::BesideImage,
        }
    }
}

impl ConfigProvider for TestConfig {
    fn corpus_name(&self) -> &str {
        "testmags"
    }

    fn corpus_path(&self) -> &str {
        &self.corpus_path
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn metadata_path(&self) -> &str {
        &self.metadata_path
    }

    fn char_threshold(&self) -> f64 {
        self.char_threshold
    }

    fn line_length(&self) -> usize {
        self.line_length
    }

    fn image_extensions(&self) -> &[String] {
        &self.image_extensions
    }

    fn unpack(&self) -> bool {
        self.unpack
    }

    fn remove_zip(&self) -> bool {
        self.remove_zip
    }

    fn save_file_list(&self) -> bool {
        self.save_file_list
    }

    fn fix_umlauts(&self) -> bool {
        self.fix_umlauts
    }

    fn output_naming(&self) -> OutputNaming {
        self.output_naming
    }
}
