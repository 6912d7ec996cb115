use futures_util::StreamExt;
use gtfs::{parse_chunk, StopTime};
use model::{LoadSession, MemorySource, SegmentedLoader};

const HEADER: &str = "trip_id,arrival_time,departure_time,stop_id,stop_sequence";

fn rows() -> Vec<String> {
    (0..10)
        .map(|i| format!("T{},08:{:02}:00,08:{:02}:00,S{},{}", i / 3, i, i, i, i % 3 + 1))
        .collect()
}

/// Splits the header and rows into chunks of `per_chunk` lines, like the splitting tool does.
fn split(per_chunk: usize) -> (MemorySource, Vec<String>) {
    let mut lines = vec![HEADER.to_string()];
    lines.extend(rows());

    let mut source = MemorySource::new();
    let mut filenames = Vec::new();
    for (idx, chunk) in lines.chunks(per_chunk).enumerate() {
        let filename = format!("stop_times_part{}.txt", idx + 1);
        source.insert(
            format!("stop_times/{filename}"),
            format!("{}\n", chunk.join("\n")),
        );
        filenames.push(filename);
    }
    (source, filenames)
}

fn manifest(filenames: &[String]) -> String {
    let segments: Vec<String> = filenames
        .iter()
        .enumerate()
        .map(|(idx, name)| format!(r#"{{"filename": "{name}", "index": {}}}"#, idx + 1))
        .collect();
    format!(
        r#"{{"totalSegments": {}, "totalLines": 11, "dataLines": 10, "linesPerSegment": 4, "segments": [{}]}}"#,
        filenames.len(),
        segments.join(", ")
    )
}

#[tokio::test]
async fn test_chunks_match_unsplit_file() {
    let (mut source, filenames) = split(4);
    assert_eq!(filenames.len(), 3);
    source.insert("stop_times/segments_info.json", manifest(&filenames));

    let session = LoadSession::quiet();
    let loaded = SegmentedLoader::new(&source, "stop_times/segments_info.json", "stop_times")
        .load_records::<StopTime>(&session)
        .await
        .unwrap()
        .unwrap();

    let whole = format!("{HEADER}\n{}\n", rows().join("\n"));
    let expected: Vec<StopTime> = parse_chunk(&whole, true);
    assert_eq!(expected.len(), 10);
    assert_eq!(loaded.data, expected);
}

#[tokio::test]
async fn test_missing_chunk_is_skipped() {
    let (mut source, mut filenames) = split(4);
    // Listed in the manifest, but never uploaded
    filenames.insert(1, "stop_times_part9.txt".to_string());
    source.insert("stop_times/segments_info.json", manifest(&filenames));

    let (session, progress) = LoadSession::new();
    let loaded = SegmentedLoader::new(&source, "stop_times/segments_info.json", "stop_times")
        .load_records::<StopTime>(&session)
        .await
        .unwrap()
        .unwrap();
    session.dispose();

    assert_eq!(loaded.data.len(), 10);
    assert_eq!(loaded.loaded_segments, 3);
    assert_eq!(loaded.failed_segments, vec!["stop_times_part9.txt".to_string()]);

    let updates: Vec<_> = progress.collect().await;
    assert_eq!(updates.len(), 4);
    assert!(updates[1].message.starts_with("Skipped segment 2 of 4"));
    assert_eq!(updates[1].loaded_segments, 1);
    assert_eq!(updates[1].records, updates[0].records);
    assert_eq!(
        updates[3].message,
        "Processed 4 of 4 segments. Found 10 items."
    );
}
