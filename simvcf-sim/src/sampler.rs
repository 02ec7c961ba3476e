//! Drawing variant positions inside an interval.

use rand::Rng;
use rand::seq::index;

use simvcf_core::models::{Interval, VariantType};

use crate::errors::SamplingError;

///
/// Draw `count` start positions inside `interval`, in ascending order.
///
/// SNPs are drawn uniformly without replacement from the whole interval.
/// Span variants are drawn so that consecutive positions are more than
/// `length` bases apart: with `A = (end - start) - (count - 1) * length`
/// free slots, `count` distinct slots are drawn from `[0, A)` and the i-th
/// smallest is shifted right by `i * length`. Every position then lies in
/// `[start, end - 1]`.
///
/// # Arguments
///
/// - rng: the generator, advanced by every call
/// - interval: closed 1-based interval to place variants in
/// - variant_type: decides between the point and the span rule
/// - count: number of positions to draw
/// - length: span length, ignored for SNPs
///
pub fn sample_positions<R: Rng + ?Sized>(
    rng: &mut R,
    interval: Interval,
    variant_type: VariantType,
    count: u32,
    length: u32,
) -> Result<Vec<u64>, SamplingError> {
    let available = check_capacity(interval, variant_type, count, length)?;
    if variant_type.is_point() {
        Ok(sample_points(rng, interval, count))
    } else {
        Ok(sample_spans(rng, interval, count, length, available))
    }
}

///
/// Shrink a span request's interval so every start leaves room for the
/// `length` bases after the anchor on a chromosome of `chrom_len` bases.
/// Point requests are returned unchanged.
///
pub fn clamp_to_chromosome(
    interval: Interval,
    variant_type: VariantType,
    count: u32,
    length: u32,
    chrom_len: u64,
) -> Result<Interval, SamplingError> {
    if variant_type.is_point() {
        return Ok(interval);
    }

    let last = chrom_len.saturating_sub(u64::from(length));
    if last <= interval.start {
        return Err(SamplingError::IntervalTooSmall {
            interval,
            variant_type,
            count,
            length,
        });
    }
    Ok(Interval::new(interval.start, interval.end.min(last)))
}

///
/// Like [`sample_positions`], but no drawn footprint may overlap an
/// `occupied` one.
///
/// Positions are drawn one at a time from the start positions that are
/// still free, and each draw removes the starts its footprint rules out.
/// A draw can still run out of free starts before reaching `count` when
/// spans leave awkward gaps, in which case the whole request is redrawn,
/// up to `max_attempts` times.
///
pub fn sample_free_positions<R: Rng + ?Sized>(
    rng: &mut R,
    interval: Interval,
    variant_type: VariantType,
    count: u32,
    length: u32,
    occupied: &[Interval],
    max_attempts: usize,
) -> Result<Vec<u64>, SamplingError> {
    check_capacity(interval, variant_type, count, length)?;

    let spacing = if variant_type.is_point() {
        0
    } else {
        u64::from(length)
    };
    let starts = if variant_type.is_point() {
        interval
    } else {
        Interval::new(interval.start, interval.end - 1)
    };

    let free = free_starts(starts, occupied, spacing);
    let free_width: u64 = free.iter().map(|s| s.width()).sum();
    if free_width == starts.width() {
        return sample_positions(rng, interval, variant_type, count, length);
    }

    // most variants each free stretch can hold when packed tightly
    let capacity: u64 = free
        .iter()
        .map(|s| (s.width() + spacing) / (spacing + 1))
        .sum();
    if u64::from(count) > capacity {
        return Err(SamplingError::Crowded {
            interval,
            variant_type,
            count,
            capacity,
        });
    }

    let attempts = max_attempts.max(1);
    for _ in 0..attempts {
        if let Some(positions) = draw_spaced(rng, &free, count, spacing) {
            return Ok(positions);
        }
    }

    Err(SamplingError::Collision { interval, attempts })
}

/// Checks that `count` variants fit into `interval` on their own, returning
/// the number of free slots.
fn check_capacity(
    interval: Interval,
    variant_type: VariantType,
    count: u32,
    length: u32,
) -> Result<u64, SamplingError> {
    if variant_type.is_point() {
        let width = interval.width();
        if count == 0 || u64::from(count) > width {
            return Err(SamplingError::IntervalTooSmall {
                interval,
                variant_type,
                count,
                length: 1,
            });
        }
        return Ok(width);
    }

    let span = interval.end - interval.start;
    let reserved = u64::from(count.saturating_sub(1)) * u64::from(length);
    if count == 0 || span <= reserved {
        return Err(SamplingError::IntervalTooSmall {
            interval,
            variant_type,
            count,
            length,
        });
    }

    let available = span - reserved;
    if u64::from(count) > available {
        return Err(SamplingError::SpacingInfeasible {
            interval,
            variant_type,
            count,
            length,
            available,
        });
    }
    Ok(available)
}

fn sample_points<R: Rng + ?Sized>(rng: &mut R, interval: Interval, count: u32) -> Vec<u64> {
    let mut positions: Vec<u64> = index::sample(rng, interval.width() as usize, count as usize)
        .into_iter()
        .map(|offset| interval.start + offset as u64)
        .collect();
    positions.sort_unstable();
    positions
}

fn sample_spans<R: Rng + ?Sized>(
    rng: &mut R,
    interval: Interval,
    count: u32,
    length: u32,
    available: u64,
) -> Vec<u64> {
    let mut slots = index::sample(rng, available as usize, count as usize).into_vec();
    slots.sort_unstable();

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| interval.start + slot as u64 + i as u64 * u64::from(length))
        .collect()
}

///
/// Stretches of `starts` where a footprint `[p, p + spacing]` would not
/// touch any `occupied` interval, in ascending order.
///
fn free_starts(starts: Interval, occupied: &[Interval], spacing: u64) -> Vec<Interval> {
    let mut blocked: Vec<Interval> = occupied
        .iter()
        .map(|o| Interval::new(o.start.saturating_sub(spacing), o.end))
        .filter(|b| b.overlaps(&starts))
        .collect();
    blocked.sort_by_key(|b| b.start);

    let mut free = Vec::new();
    let mut next = starts.start;
    for block in blocked {
        if block.start > next {
            free.push(Interval::new(next, block.start - 1));
        }
        next = next.max(block.end + 1);
    }
    if next <= starts.end {
        free.push(Interval::new(next, starts.end));
    }
    free
}

fn remove_block(segment: Interval, block: Interval) -> Vec<Interval> {
    if !segment.overlaps(&block) {
        return vec![segment];
    }
    let mut kept = Vec::with_capacity(2);
    if block.start > segment.start {
        kept.push(Interval::new(segment.start, block.start - 1));
    }
    if block.end < segment.end {
        kept.push(Interval::new(block.end + 1, segment.end));
    }
    kept
}

/// One pass of sequential draws from `free`, `None` if it runs dry.
fn draw_spaced<R: Rng + ?Sized>(
    rng: &mut R,
    free: &[Interval],
    count: u32,
    spacing: u64,
) -> Option<Vec<u64>> {
    let mut free = free.to_vec();
    let mut positions = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let total: u64 = free.iter().map(|s| s.width()).sum();
        if total == 0 {
            return None;
        }

        let mut offset = rng.random_range(0..total);
        let position = free.iter().find_map(|segment| {
            if offset < segment.width() {
                Some(segment.start + offset)
            } else {
                offset -= segment.width();
                None
            }
        })?;
        positions.push(position);

        let block = Interval::new(position.saturating_sub(spacing), position + spacing);
        free = free
            .into_iter()
            .flat_map(|segment| remove_block(segment, block))
            .collect();
    }

    positions.sort_unstable();
    Some(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::*;

    #[test]
    fn test_snps_are_distinct_sorted_and_inside() {
        let mut rng = StdRng::seed_from_u64(42);
        let interval = Interval::new(100, 110);
        let positions = sample_positions(&mut rng, interval, VariantType::Snp, 3, 1).unwrap();

        assert_eq!(positions.len(), 3);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(positions.iter().all(|p| interval.contains(*p)));
    }

    #[test]
    fn test_snps_can_fill_the_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let positions =
            sample_positions(&mut rng, Interval::new(5, 9), VariantType::Snp, 5, 1).unwrap();
        assert_eq!(positions, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_spans_are_spaced_by_more_than_length() {
        let interval = Interval::new(1000, 1010);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let positions =
                sample_positions(&mut rng, interval, VariantType::Del, 2, 3).unwrap();
            assert_eq!(positions.len(), 2);
            assert!(positions[1] - positions[0] > 3);
            assert!(positions.iter().all(|p| *p >= 1000 && *p <= 1009));
        }
    }

    #[test]
    fn test_same_seed_same_positions() {
        let interval = Interval::new(1, 1_000_000);
        let a = sample_positions(&mut StdRng::seed_from_u64(9), interval, VariantType::Ins, 50, 10);
        let b = sample_positions(&mut StdRng::seed_from_u64(9), interval, VariantType::Ins, 50, 10);
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(Interval::new(100, 102), VariantType::Snp, 4, 1)]
    #[case(Interval::new(100, 100), VariantType::Del, 1, 1)]
    #[case(Interval::new(100, 110), VariantType::Del, 3, 5)]
    fn test_interval_too_small(
        #[case] interval: Interval,
        #[case] variant_type: VariantType,
        #[case] count: u32,
        #[case] length: u32,
    ) {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_positions(&mut rng, interval, variant_type, count, length).unwrap_err();
        assert!(matches!(err, SamplingError::IntervalTooSmall { .. }));
    }

    #[test]
    fn test_span_interval_is_clamped_to_chromosome() {
        let interval =
            clamp_to_chromosome(Interval::new(1, 2000), VariantType::Del, 50, 5, 2000).unwrap();
        assert_eq!(interval, Interval::new(1, 1995));
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let positions = sample_positions(&mut rng, interval, VariantType::Del, 50, 5).unwrap();
            // the anchor and the 5 bases after it stay on the chromosome
            assert!(positions.iter().all(|p| p + 5 <= 2000));
        }
    }

    #[rstest]
    #[case(Interval::new(1, 2000), VariantType::Snp, Interval::new(1, 2000))]
    #[case(Interval::new(1, 1000), VariantType::Inv, Interval::new(1, 1000))]
    #[case(Interval::new(1990, 2000), VariantType::Cnv, Interval::new(1990, 1995))]
    fn test_clamp_to_chromosome(
        #[case] interval: Interval,
        #[case] variant_type: VariantType,
        #[case] expected: Interval,
    ) {
        assert_eq!(
            clamp_to_chromosome(interval, variant_type, 1, 5, 2000).unwrap(),
            expected
        );
    }

    #[test]
    fn test_clamp_leaves_no_room() {
        let err = clamp_to_chromosome(Interval::new(1996, 2000), VariantType::Dup, 1, 5, 2000)
            .unwrap_err();
        assert!(matches!(err, SamplingError::IntervalTooSmall { .. }));
    }

    #[test]
    fn test_free_starts() {
        let starts = Interval::new(1, 100);
        let occupied = [Interval::new(20, 25), Interval::new(50, 50), Interval::new(200, 210)];
        assert_eq!(
            free_starts(starts, &occupied, 0),
            vec![Interval::new(1, 19), Interval::new(26, 49), Interval::new(51, 100)]
        );
        // a span of length 3 starting at 17 would reach 20
        assert_eq!(
            free_starts(starts, &occupied, 3),
            vec![Interval::new(1, 16), Interval::new(26, 46), Interval::new(51, 100)]
        );
    }

    #[test]
    fn test_free_snps_fill_what_is_left() {
        let occupied: Vec<Interval> = (1..=1000).step_by(10).map(Interval::single).collect();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let positions = sample_free_positions(
                &mut rng,
                Interval::new(1, 1000),
                VariantType::Snp,
                900,
                1,
                &occupied,
                1,
            )
            .unwrap();
            assert_eq!(positions.len(), 900);
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            assert!(positions.iter().all(|p| (p - 1) % 10 != 0));
        }
    }

    #[test]
    fn test_free_spans_avoid_occupied() {
        let occupied = [Interval::new(100, 110), Interval::new(400, 404)];
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let positions = sample_free_positions(
                &mut rng,
                Interval::new(1, 600),
                VariantType::Del,
                40,
                4,
                &occupied,
                64,
            )
            .unwrap();
            assert_eq!(positions.len(), 40);
            let footprints: Vec<Interval> =
                positions.iter().map(|p| Interval::new(*p, p + 4)).collect();
            for (i, a) in footprints.iter().enumerate() {
                assert!(a.start >= 1 && a.start <= 599);
                assert!(occupied.iter().all(|o| !o.overlaps(a)));
                assert!(footprints[i + 1..].iter().all(|b| !a.overlaps(b)));
            }
        }
    }

    #[test]
    fn test_crowded_interval() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_free_positions(
            &mut rng,
            Interval::new(1, 10),
            VariantType::Snp,
            3,
            1,
            &[Interval::new(1, 8)],
            64,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SamplingError::Crowded {
                interval: Interval::new(1, 10),
                variant_type: VariantType::Snp,
                count: 3,
                capacity: 2,
            }
        );
    }

    #[test]
    fn test_tight_gap_is_redrawn_or_reported() {
        // starts 1..=10 are free, three DELs of length 3 fit only as 1/5/9 and the like
        let occupied = [Interval::new(14, 20)];
        let mut collisions = 0;
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            match sample_free_positions(
                &mut rng,
                Interval::new(1, 20),
                VariantType::Del,
                3,
                3,
                &occupied,
                1,
            ) {
                Ok(positions) => {
                    assert!(positions.windows(2).all(|w| w[1] - w[0] > 3));
                    assert!(positions.iter().all(|p| *p <= 10));
                }
                Err(err) => {
                    assert_eq!(
                        err,
                        SamplingError::Collision {
                            interval: Interval::new(1, 20),
                            attempts: 1,
                        }
                    );
                    collisions += 1;
                }
            }
        }
        assert!(collisions > 0);
    }

    #[test]
    fn test_untouched_interval_samples_like_sample_positions() {
        let interval = Interval::new(1000, 1010);
        let a = sample_positions(&mut StdRng::seed_from_u64(5), interval, VariantType::Del, 2, 3);
        let b = sample_free_positions(
            &mut StdRng::seed_from_u64(5),
            interval,
            VariantType::Del,
            2,
            3,
            &[Interval::new(1, 100), Interval::new(1020, 1030)],
            64,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_spacing_infeasible() {
        // span 10, reserved 2 * 4 = 8, two free slots for three variants
        let mut rng = StdRng::seed_from_u64(1);
        let err =
            sample_positions(&mut rng, Interval::new(1, 11), VariantType::Dup, 3, 4).unwrap_err();
        assert_eq!(
            err,
            SamplingError::SpacingInfeasible {
                interval: Interval::new(1, 11),
                variant_type: VariantType::Dup,
                count: 3,
                length: 4,
                available: 2,
            }
        );
    }
}
