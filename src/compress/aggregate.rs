//! Per-node ordering and aggregation of a target batch.

use crate::aggregation::Aggregation;

/// Sorts `targets` ascending and, unless `keep_parallel`, drops repeated ids.
///
/// Returns the length of the surviving prefix.
pub(crate) fn sort_and_dedup(targets: &mut [u64], keep_parallel: bool) -> usize {
    targets.sort_unstable();
    if keep_parallel || targets.len() < 2 {
        return targets.len();
    }

    let mut write = 1;
    for read in 1..targets.len() {
        if targets[read] != targets[write - 1] {
            targets[write] = targets[read];
            write += 1;
        }
    }
    write
}

/// Scratch space for ordering targets together with their property values.
///
/// Equal ids keep their input order, so merges fold values in the order the
/// caller supplied them and the result is reproducible.
#[derive(Debug, Default)]
pub(crate) struct PropertyAggregator {
    order: Vec<usize>,
    targets: Vec<u64>,
    channels: Vec<Vec<u64>>,
}

impl PropertyAggregator {
    pub(crate) fn new(channels: usize) -> Self {
        Self {
            order: Vec::new(),
            targets: Vec::new(),
            channels: vec![Vec::new(); channels],
        }
    }

    /// Sorts `targets` and merges the values of repeated ids per channel.
    ///
    /// With `keep_parallel` every relationship survives and values are only
    /// reordered. Otherwise the first value of an id is normalized and later
    /// ones are merged into it with the channel's policy.
    ///
    /// Returns the number of surviving relationships.
    pub(crate) fn aggregate(
        &mut self,
        targets: &[u64],
        properties: &[&[u64]],
        aggregations: &[Aggregation],
        keep_parallel: bool,
    ) -> usize {
        debug_assert_eq!(properties.len(), self.channels.len());
        debug_assert_eq!(aggregations.len(), self.channels.len());

        self.order.clear();
        self.order.extend(0..targets.len());
        self.order.sort_by_key(|&index| targets[index]);

        self.targets.clear();
        for channel in &mut self.channels {
            channel.clear();
        }

        for &index in &self.order {
            let target = targets[index];
            let repeated = self.targets.last() == Some(&target);
            let slots = self.channels.iter_mut().zip(properties).zip(aggregations);

            if repeated && !keep_parallel {
                for ((channel, values), aggregation) in slots {
                    if let Some(running) = channel.last_mut() {
                        *running = aggregation.merge_bits(*running, values[index]);
                    }
                }
            } else {
                self.targets.push(target);
                for ((channel, values), aggregation) in slots {
                    let value = values[index];
                    channel.push(if keep_parallel {
                        value
                    } else {
                        aggregation.normalize_bits(value)
                    });
                }
            }
        }
        self.targets.len()
    }

    /// Surviving ids of the last [`aggregate`](Self::aggregate) call.
    pub(crate) fn targets(&self) -> &[u64] {
        &self.targets
    }

    /// Values of `channel` aligned with [`targets`](Self::targets).
    pub(crate) fn channel(&self, channel: usize) -> &[u64] {
        &self.channels[channel]
    }
}
