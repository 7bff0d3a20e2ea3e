#![no_main]

use std::io::Write;
use std::sync::Arc;

use chunkstream::{ChunkedStream, SharedPool, TextEncoding};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    let pool = Arc::new(SharedPool::new());

    for chunk_size in [1, 7, 64, 4096] {
        let mut stream = ChunkedStream::new(pool.clone(), chunk_size);
        stream.write_all(&data).unwrap();

        match (stream.get_string(TextEncoding::Utf8), std::str::from_utf8(&data)) {
            (Ok(Some(text)), Ok(expected)) => assert_eq!(text, expected),
            (Ok(None), Ok(expected)) => assert!(expected.is_empty()),
            (Err(_), Err(_)) => {}
            (actual, expected) => panic!("decoding diverged: {actual:?} vs {expected:?}"),
        }

        let lossy = stream.get_string(TextEncoding::Utf8Lossy).unwrap();
        assert_eq!(lossy.unwrap_or_default(), String::from_utf8_lossy(&data));
    }

    let stats = pool.stats();
    assert_eq!(stats.leased, stats.released);
});
