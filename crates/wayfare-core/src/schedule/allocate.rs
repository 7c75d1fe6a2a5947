//! Slot time allocation.
//!
//! A slot's fixed `[StartTime, EndTime]` range is divided among its
//! activities in order: equal floor-minute shares, with every leftover
//! minute absorbed by the final activity so the partition is exact and
//! gapless. The allocator is pure; it must be re-run over the full
//! activity sequence of every slot whose membership or order changed,
//! including the donor slot of a cross-slot move.

use wayfare_store::models::{ActivitySlot, LunchSlot};

use crate::timefmt::{self, FormatError};

/// Partition `[slot_start, slot_end)` minutes into `count` ordered ranges.
///
/// `count` must be at least 1 and `slot_end` must be after `slot_start`
/// (slots never cross midnight). A single activity spans the slot
/// verbatim; otherwise share `i` occupies
/// `[start + i*share, start + (i+1)*share)` with the last share extended
/// to exactly `slot_end`.
pub fn allocate(slot_start: u32, slot_end: u32, count: usize) -> Vec<(u32, u32)> {
    debug_assert!(count >= 1);
    debug_assert!(slot_end > slot_start);

    if count == 1 {
        return vec![(slot_start, slot_end)];
    }

    let total = slot_end - slot_start;
    let share = total / count as u32;

    (0..count)
        .map(|i| {
            let start = slot_start + i as u32 * share;
            let end = if i == count - 1 {
                slot_end
            } else {
                start + share
            };
            (start, end)
        })
        .collect()
}

/// Recompute the `TimeSlot` and `Duration` strings of every activity in a
/// sequence slot from the slot's fixed bounds.
///
/// A [`FormatError`] aborts just this recomputation (the slot keeps its
/// previous strings); the caller treats it as recoverable.
pub fn reflow_slot(slot: &mut ActivitySlot) -> Result<(), FormatError> {
    if slot.activities.is_empty() {
        return Ok(());
    }

    let start = timefmt::parse_time(&slot.start_time)?;
    let end = timefmt::parse_time(&slot.end_time)?;
    let ranges = allocate(start, end, slot.activities.len());

    for (activity, (from, to)) in slot.activities.iter_mut().zip(ranges) {
        activity.time_slot = timefmt::format_range(from, to);
        activity.duration = timefmt::format_duration(to - from);
    }
    Ok(())
}

/// Recompute the Lunch activity's strings; the single activity spans the
/// full slot.
pub fn reflow_lunch(slot: &mut LunchSlot) -> Result<(), FormatError> {
    let start = timefmt::parse_time(&slot.start_time)?;
    let end = timefmt::parse_time(&slot.end_time)?;
    slot.activity.time_slot = timefmt::format_range(start, end);
    slot.activity.duration = timefmt::format_duration(end - start);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use wayfare_test_utils::fixtures;

    #[test]
    fn single_activity_spans_the_slot_verbatim() {
        assert_eq!(allocate(480, 720, 1), vec![(480, 720)]);
    }

    #[test]
    fn two_activities_split_a_morning_evenly() {
        // 8:00 AM - 12:00 PM, two activities -> 8-10 and 10-12.
        assert_eq!(allocate(480, 720, 2), vec![(480, 600), (600, 720)]);
    }

    #[test]
    fn three_activities_split_540_minutes_into_180s() {
        // 9:00 AM - 6:00 PM.
        assert_eq!(
            allocate(540, 1080, 3),
            vec![(540, 720), (720, 900), (900, 1080)]
        );
    }

    #[test]
    fn remainder_lands_entirely_in_the_final_share() {
        // 100 minutes over 3 activities: 33 + 33 + 34.
        let ranges = allocate(0, 100, 3);
        assert_eq!(ranges, vec![(0, 33), (33, 66), (66, 100)]);
    }

    #[test]
    fn partition_is_exact_and_gapless_for_many_counts() {
        for count in 1..=12 {
            let ranges = allocate(480, 720, count);
            assert_eq!(ranges.len(), count);
            assert_eq!(ranges[0].0, 480);
            assert_eq!(ranges[count - 1].1, 720);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].1, pair[1].0, "gap or overlap at {pair:?}");
            }
        }
    }

    #[test]
    fn reflow_rewrites_time_slot_and_duration_strings() {
        let mut slot = wayfare_store::models::ActivitySlot {
            start_time: "8:00 AM".to_owned(),
            end_time: "12:00 PM".to_owned(),
            activities: vec![
                fixtures::activity("a", "Senso-ji Temple", "stale", "stale"),
                fixtures::activity("b", "Ueno Park", "stale", "stale"),
            ],
        };
        reflow_slot(&mut slot).unwrap();
        assert_eq!(slot.activities[0].time_slot, "8:00 AM - 10:00 AM");
        assert_eq!(slot.activities[1].time_slot, "10:00 AM - 12:00 PM");
        assert_eq!(slot.activities[0].duration, "2 hours");
    }

    #[test]
    fn reflow_with_bad_bounds_leaves_strings_untouched() {
        let mut slot = wayfare_store::models::ActivitySlot {
            start_time: "whenever".to_owned(),
            end_time: "12:00 PM".to_owned(),
            activities: vec![fixtures::activity("a", "Senso-ji Temple", "old", "old")],
        };
        assert!(reflow_slot(&mut slot).is_err());
        assert_eq!(slot.activities[0].time_slot, "old");
    }
}
