#![no_main]

use std::io::{Read, Write};
use std::sync::Arc;

use chunkstream::{ChunkedStream, SharedPool};
use libfuzzer_sys::fuzz_target;

const CHUNK_SIZE: usize = 16;

/// Flat model of the chunk storage: one slot per byte of every held chunk.
struct Model {
    slots: Vec<u8>,
    length: usize,
    position: usize,
}

impl Model {
    fn cover(&mut self, end: usize) {
        let needed = end.div_ceil(CHUNK_SIZE) * CHUNK_SIZE;
        if self.slots.len() < needed {
            self.slots.resize(needed, 0);
        }
    }

    fn write(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let end = self.position + data.len();
        self.cover(end);
        self.slots[self.position..end].copy_from_slice(data);
        self.position = end;
        self.length = self.length.max(end);
    }

    fn read(&mut self, count: usize) -> Vec<u8> {
        let end = (self.position + count).min(self.length);
        let out = self.slots[self.position.min(end)..end].to_vec();
        self.position = self.position.max(end);
        out
    }

    fn set_len(&mut self, len: usize) {
        if len < self.length {
            let keep = (len / CHUNK_SIZE + 1) * CHUNK_SIZE;
            self.slots.truncate(keep);
            self.position = self.position.min(len);
        } else {
            self.cover(len);
        }
        self.length = len;
    }
}

fuzz_target!(|data: Vec<u8>| {
    let pool = Arc::new(SharedPool::new());
    let mut stream = ChunkedStream::new(pool.clone(), CHUNK_SIZE);
    let mut model = Model { slots: Vec::new(), length: 0, position: 0 };

    for op in data.chunks(2) {
        let arg = op.get(1).copied().unwrap_or(0) as usize;
        match op[0] % 5 {
            0 => {
                let bytes: Vec<u8> = (0..arg).map(|i| (i as u8) ^ op[0]).collect();
                stream.write_all(&bytes).unwrap();
                model.write(&bytes);
            }
            1 => {
                let mut buf = vec![0u8; arg];
                let n = stream.read(&mut buf).unwrap();
                assert_eq!(&buf[..n], &model.read(arg)[..]);
            }
            2 => {
                stream.set_position(arg as u64);
                model.position = arg;
            }
            3 => {
                stream.set_len(arg);
                model.set_len(arg);
            }
            _ => {
                stream.dispose();
                model = Model { slots: Vec::new(), length: 0, position: 0 };
            }
        }

        assert_eq!(stream.len(), model.length);
        assert_eq!(stream.position(), model.position as u64);
        assert_eq!(stream.to_vec(), model.slots[..model.length].to_vec());
    }

    drop(stream);
    let stats = pool.stats();
    assert_eq!(stats.leased, stats.released);
});
