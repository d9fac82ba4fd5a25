use crate::common::current_time_millis;
use log::{info, warn};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const MAX_NODE_ID: u64 = (1 << NODE_ID_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_SHIFT: u64 = NODE_ID_BITS + SEQUENCE_BITS;
const EPOCH: u64 = 1_288_834_974_657;

pub(crate) struct SnowflakeIdGenerator {
    node_id: u64,
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    last_timestamp: u64,
    sequence: u64,
}

impl SnowflakeIdGenerator {
    pub(crate) fn new() -> Self {
        let node_id = derive_node_id();
        info!("Initialized id generator with node id: {}", node_id);

        SnowflakeIdGenerator {
            node_id,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    pub(crate) fn get_id(&self) -> u64 {
        let mut state = self.state.lock();

        let now = current_time_millis();
        if now < state.last_timestamp {
            warn!(
                "Clock moved backwards by {}ms, reusing last timestamp",
                state.last_timestamp - now
            );
        }
        let mut timestamp = now.max(state.last_timestamp);

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            // sequence exhausted within this millisecond
            if state.sequence == 0 {
                timestamp += 1;
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        ((timestamp - EPOCH) << TIMESTAMP_SHIFT) | (self.node_id << SEQUENCE_BITS) | state.sequence
    }
}

// node id derived from a random uuid byte mixed with OS randomness
fn derive_node_id() -> u64 {
    let uid = *uuid::Uuid::new_v4().as_bytes();
    let rnd = OsRng.gen::<u64>();
    ((uid[uid.len() - 1] as u64) ^ rnd) & MAX_NODE_ID
}
