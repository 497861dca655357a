use super::*;
use crate::node::{FixedNode, NoNode};
use crate::VERSION_TAG;

const NODE: u64 = 0x0123_4567_89ab;
const TS: u64 = 0x003e_5e2b_6e3a_45a0;

impl Generator<StdSystemTime> {
    /// Creates a generator with an in-memory sequence number and a fixed node.
    fn for_testing() -> Self {
        Self::with_config(Config::new().without_state_file(), FixedNode(NODE)).unwrap()
    }
}

/// A time source that stands still and moves forward by one resolution step every `period` reads.
#[derive(Debug)]
struct SteppingTime {
    now: u64,
    reads: u64,
    period: u64,
}

impl SteppingTime {
    fn new(now: u64, period: u64) -> Self {
        Self {
            now,
            reads: 0,
            period,
        }
    }
}

impl TimeSource for SteppingTime {
    fn now_ticks(&mut self) -> u64 {
        self.reads += 1;
        if self.reads % self.period == 0 {
            self.now += 16;
        }
        self.now
    }
}

/// A time source that replays a fixed list of readings and then repeats the last one.
#[derive(Debug)]
struct ReplayTime(std::vec::IntoIter<u64>, u64);

impl ReplayTime {
    fn new(readings: Vec<u64>) -> Self {
        Self(readings.into_iter(), 0)
    }
}

impl TimeSource for ReplayTime {
    fn now_ticks(&mut self) -> u64 {
        if let Some(e) = self.0.next() {
            self.1 = e;
        }
        self.1
    }
}

fn in_memory<T: TimeSource>(time: T) -> Generator<T> {
    Generator::with_time_source(Config::new().without_state_file(), FixedNode(NODE), time)
        .unwrap()
}

/// Returns the clock tick embedded in `e`, assuming the tick leaves the version tag bit clear
fn tick_of(e: &Uuid) -> u64 {
    let hi = (e.time_hi_and_version() & !VERSION_TAG & 0x0fff) as u64;
    (hi << 48) | ((e.time_mid() as u64) << 32) | e.time_low() as u64
}

/// Generates strings of the requested shape
#[test]
fn generates_strings_of_the_requested_shape() {
    let cases = [
        (Format::Default, r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"),
        (Format::Compact, r"^[0-9a-f]{32}$"),
        (
            Format::Urn,
            r"^urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
        ),
        (Format::Teenie, r"^[0-9A-Za-z]{24}$"),
    ];

    let g = Generator::for_testing();
    for (format, pattern) in cases {
        let re = regex::Regex::new(pattern).unwrap();
        for _ in 0..1_000 {
            let e = g.generate(format);
            assert!(re.is_match(&e), "{} {:?}", format, e);
            assert!(format.validate(&e));
        }
    }
}

/// Generates 100k identifiers without collision
#[test]
fn generates_100k_identifiers_without_collision() {
    use std::collections::HashSet;
    const N_SAMPLES: usize = 100_000;

    let g = Generator::for_testing();
    let s: HashSet<String> = (0..N_SAMPLES).map(|_| g.generate(Format::Default)).collect();
    assert_eq!(s.len(), N_SAMPLES);
}

/// Embeds node, sequence and version tag
#[test]
fn embeds_node_sequence_and_version_tag() {
    let g = Generator::for_testing();
    for e in g.iter().take(1_000) {
        assert_eq!(e.node(), NODE);
        assert_eq!(e.time_hi_and_version() & VERSION_TAG, VERSION_TAG);
    }
    let seq = g.sequence();
    assert_eq!(g.generate_uuid().clock_seq(), g.sequence());
    assert!(g.sequence().wrapping_sub(seq) < 2);
}

/// Encodes up-to-date timestamp
#[test]
fn encodes_up_to_date_timestamp() {
    let g = Generator::for_testing();
    for _ in 0..10_000 {
        let ts_now = StdSystemTime.now_ticks() as i64;
        let timestamp = tick_of(&g.generate_uuid()) as i64;
        // 100 ms
        assert!((ts_now - timestamp).abs() < 1_000_000);
    }
}

/// Bumps tick within a resolution step and rolls sequence when the step repeats
#[test]
fn bumps_tick_within_a_resolution_step_and_rolls_sequence_when_the_step_repeats() {
    let g = in_memory(ReplayTime::new(vec![TS, TS, TS, TS, TS + 16]));
    let seq = g.sequence();

    let e = g.generate_uuid();
    assert_eq!((tick_of(&e), e.clock_seq()), (TS, seq));
    let e = g.generate_uuid();
    assert_eq!((tick_of(&e), e.clock_seq()), (TS + 1, seq));
    let e = g.generate_uuid();
    assert_eq!((tick_of(&e), e.clock_seq()), (TS, seq.wrapping_add(1)));
    let e = g.generate_uuid();
    assert_eq!((tick_of(&e), e.clock_seq()), (TS + 1, seq.wrapping_add(1)));
    let e = g.generate_uuid();
    assert_eq!((tick_of(&e), e.clock_seq()), (TS + 16, seq.wrapping_add(1)));
}

/// Rolls sequence when clock moves backwards
#[test]
fn rolls_sequence_when_clock_moves_backwards() {
    let back = TS - 3_600 * crate::clock::TICKS_PER_SECOND;
    let g = in_memory(ReplayTime::new(vec![TS, back, back + 16]));
    let seq = g.sequence();

    assert_eq!(tick_of(&g.generate_uuid()), TS);
    let e = g.generate_uuid();
    assert_eq!((tick_of(&e), e.clock_seq()), (back, seq.wrapping_add(1)));
    let e = g.generate_uuid();
    assert_eq!((tick_of(&e), e.clock_seq()), (back + 16, seq.wrapping_add(1)));
}

/// Waits for clock after drift ceiling without duplicating identifiers
#[test]
fn waits_for_clock_after_drift_ceiling_without_duplicating_identifiers() {
    use crate::clock::MAX_DRIFT;
    use std::collections::HashSet;

    let g = in_memory(SteppingTime::new(TS, 25_000));
    let seq = g.sequence();

    // one fresh tick, then MAX_DRIFT - 1 pairs of bumped and rolled-over ticks
    let n = 2 * MAX_DRIFT as usize - 1;
    let samples: Vec<Uuid> = g.iter().take(n).collect();
    let s: HashSet<Uuid> = samples.iter().copied().collect();
    assert_eq!(s.len(), n);
    assert!(samples.iter().all(|e| tick_of(e) == TS || tick_of(e) == TS + 1));

    // the next one has to wait until the time source moves
    let e = g.generate_uuid();
    assert_eq!(tick_of(&e), TS + 16);
    assert_eq!(e.clock_seq(), seq.wrapping_add(MAX_DRIFT as u16 - 1));
    assert!(!s.contains(&e));
}

/// Rejects unknown format token without touching state
#[test]
fn rejects_unknown_format_token_without_touching_state() {
    let g = in_memory(ReplayTime::new(vec![TS]));
    let seq = g.sequence();
    for _ in 0..3 {
        assert!(matches!(
            g.generate_as("bogus"),
            Err(Error::InvalidFormat(ref s)) if s == "bogus"
        ));
    }
    assert_eq!(g.sequence(), seq);
    assert_eq!(g.lock().clock.last(), 0);

    let e = g.generate_as("compact").unwrap();
    assert_eq!(Format::Compact.parse(&e).unwrap().clock_seq(), seq);
}

/// Generates no IDs sharing same timestamp and sequence under multithreading
#[test]
fn generates_no_ids_sharing_same_timestamp_and_sequence_under_multithreading(
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    use std::{collections::HashSet, sync::mpsc};

    let g = sync::Arc::new(Generator::for_testing());
    let (tx, rx) = mpsc::channel();
    for _ in 0..4 {
        let tx = tx.clone();
        let g = sync::Arc::clone(&g);
        thread::Builder::new()
            .spawn(move || {
                for _ in 0..10_000 {
                    tx.send(g.generate_uuid()).unwrap();
                }
            })
            .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
    }
    drop(tx);

    let mut s = HashSet::new();
    while let Ok(e) = rx.recv() {
        s.insert(<[u8; 10]>::try_from(&e.as_bytes()[..10]).unwrap());
    }

    assert_eq!(s.len(), 4 * 10_000);
    Ok(())
}

/// Takes next sequence number in memory
#[test]
fn takes_next_sequence_number_in_memory() {
    let g = Generator::for_testing();
    let seq = g.sequence();
    assert_eq!(g.next_sequence(), seq.wrapping_add(1));
    assert_eq!(g.next_sequence(), seq.wrapping_add(2));
    assert_eq!(g.sequence(), seq.wrapping_add(2));
    assert_eq!(g.state_file(), None);
}

/// Fails without node identifier when persistence is disabled
#[test]
fn fails_without_node_identifier_when_persistence_is_disabled() {
    assert!(matches!(
        Generator::with_config(Config::new().without_state_file(), NoNode),
        Err(Error::NodeIdentityUnavailable)
    ));
}

/// Describes node as MAC address with sequence
#[test]
fn describes_node_as_mac_address_with_sequence() {
    let g = Generator::for_testing();
    assert_eq!(g.node_id(), NODE);
    assert_eq!(
        g.to_string(),
        format!("MAC: 01:23:45:67:89:ab  Sequence: {}", g.sequence())
    );
}

/// Translates without touching state
#[test]
fn translates_without_touching_state() {
    let g = in_memory(ReplayTime::new(vec![TS]));
    let seq = g.sequence();
    let x = "6e3a45a0-5e2b-013e-a5f2-0123456789ab";
    let teenie = g.translate(x, Format::Default, Format::Teenie).unwrap();
    assert_eq!(
        g.translate(&teenie, Format::Teenie, Format::Default).unwrap(),
        x
    );
    assert!(matches!(
        g.translate(x, Format::Default, Format::Default),
        Err(Error::NoopTranslation(Format::Default))
    ));
    assert_eq!(g.sequence(), seq);
    assert_eq!(g.lock().clock.last(), 0);
}
