//! Property tests for the scheduling invariants

use proptest::prelude::*;

use crate::channels::{ChannelBits, RankTable};
use crate::window::{OperatingMode, Slot, WindowScheduler};

const PORTS: usize = 3;

fn scheduler(ports: [u8; PORTS], mode_bits: u8, period: u16) -> WindowScheduler<PORTS> {
    let mut sched = WindowScheduler::with_mode(OperatingMode::from_bits(mode_bits));
    sched.set_base_states(ports);
    sched.set_period(period);
    sched
}

proptest! {
    #[test]
    fn ranks_are_a_bijection(ports in any::<[u8; PORTS]>()) {
        let base = ChannelBits::from_ports(ports);
        let table = RankTable::derive(&base);

        prop_assert_eq!(usize::from(table.active_count()), base.count_ones());

        let mut seen = [false; PORTS * 8];
        for channel in 0..PORTS * 8 {
            match table.rank_of(channel) {
                Some(rank) => {
                    prop_assert!(base.is_on(channel));
                    prop_assert!(rank < table.active_count());
                    prop_assert!(!seen[usize::from(rank)]);
                    seen[usize::from(rank)] = true;
                }
                None => prop_assert!(!base.is_on(channel)),
            }
        }
    }

    #[test]
    fn period_respects_floor(
        ports in any::<[u8; PORTS]>(),
        mode_bits in 0u8..4,
        requested in 0u16..64,
    ) {
        let sched = scheduler(ports, mode_bits, requested);
        let floor = sched.active_count() + u16::from(mode_bits & 1);

        prop_assert!(sched.period() >= floor);
        if requested >= floor {
            prop_assert_eq!(sched.period(), requested);
        } else {
            prop_assert_eq!(sched.period(), floor);
        }
    }

    #[test]
    fn every_active_channel_isolated_once(
        ports in any::<[u8; PORTS]>(),
        mode_bits in 0u8..4,
        requested in 0u16..64,
    ) {
        let sched = scheduler(ports, mode_bits, requested);
        prop_assume!(sched.active_count() > 1);

        let offset = sched.active_offset();
        let mut isolated = [0u8; PORTS * 8];
        for window in 0..sched.period() {
            match sched.isolated_channel(window) {
                Some(channel) => {
                    prop_assert!(window >= offset);
                    prop_assert_eq!(sched.rank_of(channel), Some(window - offset));
                    isolated[channel] += 1;
                }
                None => prop_assert!(window < offset),
            }
        }
        for channel in 0..PORTS * 8 {
            let expected = u8::from(sched.base().is_on(channel));
            prop_assert_eq!(isolated[channel], expected);
        }
    }

    #[test]
    fn measurement_bitmap_matches_mode(
        ports in any::<[u8; PORTS]>(),
        mode_bits in 0u8..4,
        requested in 0u16..64,
    ) {
        let sched = scheduler(ports, mode_bits, requested);
        let subtractive = sched.mode().subtractive;

        for window in 0..sched.period() {
            let bits = sched.compute_window(window);
            match sched.classify(window) {
                Slot::Hold => prop_assert_eq!(&bits, sched.base()),
                Slot::Quiescent => prop_assert!(bits.is_empty()),
                Slot::Measure { .. } => {
                    let isolated = sched.isolated_channel(window);
                    for channel in 0..PORTS * 8 {
                        let expected = if Some(channel) == isolated {
                            !subtractive
                        } else {
                            subtractive && sched.base().is_on(channel)
                        };
                        prop_assert_eq!(bits.is_on(channel), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn compute_window_is_pure(
        ports in any::<[u8; PORTS]>(),
        mode_bits in 0u8..4,
        requested in 0u16..64,
        window in 0u16..64,
    ) {
        let sched = scheduler(ports, mode_bits, requested);
        let window = window % sched.period().max(1);
        let first = sched.compute_window(window);

        // Querying other slots in between must not change the answer
        for other in (0..sched.period()).rev() {
            let _ = sched.compute_window(other);
        }
        prop_assert_eq!(sched.compute_window(window), first);
        prop_assert_eq!(sched.clone().compute_window(window), first);
    }

    #[test]
    fn no_active_channels_passes_base_through(
        mode_bits in 0u8..4,
        requested in 0u16..16,
    ) {
        let sched = scheduler([0; PORTS], mode_bits, requested);
        for window in 0..sched.period() {
            prop_assert!(sched.compute_window(window).is_empty());
        }
    }
}
