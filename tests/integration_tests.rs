mod common;

use common::{sample_disk, write_zip, DiskBuilder, TestConfig};
use diskmag_text::core::metadata::MetadataStore;
use diskmag_text::core::pipeline::{CONTENTS_HEADING, DIRECTORY_HEADING};
use diskmag_text::core::{OutputNaming, Pipeline};
use diskmag_text::{ConversionEngine, D64Reader, DiskmagPipeline, LocalStorage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ARTICLE: &str = "Hallo Welt, dies ist ein Artikel.";

fn corpus_with_zipped_issue(root: &Path) {
    let issue = root.join("Magazin").join("1991-01");
    fs::create_dir_all(&issue).unwrap();
    write_zip(&issue.join("issue.zip"), "issue.d64", &sample_disk(ARTICLE));
}

#[tokio::test]
async fn test_end_to_end_conversion_of_zipped_corpus() {
    let corpus_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    corpus_with_zipped_issue(corpus_dir.path());

    let metadata_path = output_dir.path().join("metadata.json");
    let mut config = TestConfig::new(corpus_dir.path(), &metadata_path);
    config.output_path = Some(output_dir.path().to_str().unwrap().to_string());
    config.remove_zip = true;
    config.save_file_list = true;

    let storage = LocalStorage::new(output_dir.path());
    let pipeline = DiskmagPipeline::new(storage, config, D64Reader);
    let engine = ConversionEngine::new_with_monitoring(pipeline, false);

    let result = engine.run().await;
    assert!(result.is_ok(), "conversion failed: {:?}", result.err());
    assert_eq!(result.unwrap(), metadata_path.display().to_string());

    // archive unpacked and removed
    let issue_dir = corpus_dir.path().join("Magazin/1991-01");
    assert!(issue_dir.join("issue.d64").exists());
    assert!(!issue_dir.join("issue.zip").exists());

    let text = fs::read_to_string(output_dir.path().join("Magazin/1991-01/issue.d64.txt")).unwrap();
    assert!(text.starts_with(DIRECTORY_HEADING));
    assert!(text.contains(CONTENTS_HEADING));
    assert!(text.contains("\"artikel\""));
    assert!(text.contains("SEQ"));
    assert!(!text.contains("BLOCKS FREE"));
    assert!(text.contains(&format!("\n\tartikel\n\n{}\n", ARTICLE)));
    assert!(text.contains("\n\tintro\n\nCode\n"));
    assert!(text.contains("\n\tpacked\n\nCompressed file\n"));
    assert!(text.contains("\n\told\n\nDeleted file\n"));

    let records = MetadataStore::new(&metadata_path).load().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.file, "issue.d64");
    assert_eq!(record.diskmag, "Magazin");
    assert_eq!(record.issue, "1991-01");
    assert_eq!(record.file_count, 4);
    assert_eq!(record.extensions, "DEL, PRG, SEQ");
    assert_eq!(record.text_files, 1);
    assert_eq!(record.code_files, 1);
    assert_eq!(record.compressed_files, 1);
    assert_eq!(record.size_kb, 170.75);
    assert!(record.converted_location.ends_with("Magazin/1991-01/issue.d64.txt"));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&metadata_path).unwrap()).unwrap();
    let entry = &raw[0];
    assert!(entry.get("location of converted diskmag").is_some());
    assert!(entry.get("size in kb").is_some());
    assert!(entry.get("amount of files").is_some());
    assert!(entry.get("available extensions").is_some());

    let file_list = fs::read_to_string(corpus_dir.path().join("testmags_filelist.txt")).unwrap();
    assert!(file_list.starts_with("List of all files in the corpus testmags"));
    assert!(file_list.contains("issue.d64"));
}

#[tokio::test]
async fn test_metadata_accumulates_across_runs() {
    let corpus_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    corpus_with_zipped_issue(corpus_dir.path());
    let metadata_path = output_dir.path().join("meta/metadata.json");

    for _ in 0..2 {
        let mut config = TestConfig::new(corpus_dir.path(), &metadata_path);
        config.output_path = Some(output_dir.path().to_str().unwrap().to_string());
        let pipeline =
            DiskmagPipeline::new(LocalStorage::new(output_dir.path()), config, D64Reader);
        ConversionEngine::new(pipeline).run().await.unwrap();
    }

    let records = MetadataStore::new(&metadata_path).load().unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_broken_images_are_skipped() {
    let corpus_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let issue = corpus_dir.path().join("Magazin/1991-02");
    fs::create_dir_all(&issue).unwrap();
    fs::write(issue.join("broken.d64"), vec![0u8; 100]).unwrap();
    fs::write(issue.join("side_a.d64"), sample_disk(ARTICLE)).unwrap();
    fs::write(issue.join("broken.zip"), b"not a zip archive").unwrap();

    let metadata_path = output_dir.path().join("metadata.json");
    let mut config = TestConfig::new(corpus_dir.path(), &metadata_path);
    config.output_path = Some(output_dir.path().to_str().unwrap().to_string());
    config.remove_zip = true;

    let pipeline = DiskmagPipeline::new(LocalStorage::new(output_dir.path()), config, D64Reader);
    let images = pipeline.extract().await.unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].filename, "side_a.d64");
    assert_eq!(images[0].files.len(), 4);
    // unreadable archives stay in place
    assert!(issue.join("broken.zip").exists());
}

#[tokio::test]
async fn test_issue_index_naming_and_wrapping() {
    let corpus_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let issue = corpus_dir.path().join("Magazin/Ausgabe 3");
    fs::create_dir_all(&issue).unwrap();

    let long_line = "Dies ist eine sehr lange Zeile aus einem alten Diskmag";
    let disk = DiskBuilder::new(b"AUSGABE")
        .file(0x81, b"TEXT", &common::petscii(long_line))
        .build();
    fs::write(issue.join("a_side.d64"), &disk).unwrap();
    fs::write(issue.join("b_side.d64"), &disk).unwrap();

    let metadata_path = output_dir.path().join("metadata.json");
    let mut config = TestConfig::new(corpus_dir.path(), &metadata_path);
    config.output_path = Some(output_dir.path().to_str().unwrap().to_string());
    config.output_naming = OutputNaming::IssueIndex;
    config.line_length = 20;

    let pipeline = DiskmagPipeline::new(LocalStorage::new(output_dir.path()), config, D64Reader);
    ConversionEngine::new(pipeline).run().await.unwrap();

    let out = output_dir.path().join("Magazin/Ausgabe 3");
    assert!(out.join("ausgabe_3_1.txt").exists());
    let text = fs::read_to_string(out.join("ausgabe_3_2.txt")).unwrap();

    let contents = text.split(CONTENTS_HEADING).nth(1).unwrap();
    let body: Vec<&str> = contents
        .lines()
        .skip_while(|line| *line != "\ttext")
        .skip(2)
        .take_while(|line| !line.is_empty())
        .collect();
    assert!(body.len() > 1);
    assert!(body.iter().all(|line| line.chars().count() <= 20));
    assert_eq!(body.join(" "), long_line);
}

#[tokio::test]
async fn test_umlaut_fix_applies_to_text_only() {
    let corpus_dir = TempDir::new().unwrap();
    let issue = corpus_dir.path().join("Magazin/1992-05");
    fs::create_dir_all(&issue).unwrap();
    let disk = DiskBuilder::new(b"MAG")
        .file(0x81, b"GRUSS", &common::petscii("Gruesse aus Koeln"))
        .build();
    fs::write(issue.join("disk.d64"), disk).unwrap();

    let metadata_path = corpus_dir.path().join("metadata.json");
    let mut config = TestConfig::new(corpus_dir.path(), &metadata_path);
    config.unpack = false;
    config.fix_umlauts = true;

    // no output path: documents land next to the images
    let pipeline = DiskmagPipeline::new(LocalStorage::new(corpus_dir.path()), config, D64Reader);
    ConversionEngine::new(pipeline).run().await.unwrap();

    let text = fs::read_to_string(issue.join("disk.d64.txt")).unwrap();
    assert!(text.contains("Grüße aus Köln"));
}

#[tokio::test]
async fn test_issue_index_naming_survives_rerun_in_place() {
    let corpus_dir = TempDir::new().unwrap();
    let issue = corpus_dir.path().join("Magazin/Ausgabe");
    fs::create_dir_all(&issue).unwrap();
    fs::write(issue.join("side_a.d64"), sample_disk(ARTICLE)).unwrap();
    let metadata_path = corpus_dir.path().join("metadata.json");

    for _ in 0..2 {
        let mut config = TestConfig::new(corpus_dir.path(), &metadata_path);
        config.output_naming = OutputNaming::IssueIndex;
        config.save_file_list = true;
        let pipeline =
            DiskmagPipeline::new(LocalStorage::new(corpus_dir.path()), config, D64Reader);
        ConversionEngine::new(pipeline).run().await.unwrap();
    }

    assert!(issue.join("ausgabe_1.txt").exists());
    assert!(!issue.join("ausgabe_2.txt").exists());

    let records = MetadataStore::new(&metadata_path).load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].converted_location, records[1].converted_location);
}
