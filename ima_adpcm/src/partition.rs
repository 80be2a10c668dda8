use core::ops::Range;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockDescriptor {
    pub index: usize,
    pub byte_offset: usize,
}

/// Splits a flat buffer into whole blocks. Bytes past the last whole block are not decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockPartition {
    block_size: usize,
    block_count: usize,
    trailing_bytes: usize,
}

impl BlockPartition {
    pub fn new(total_len: usize, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be non-zero");

        Self {
            block_size,
            block_count: total_len / block_size,
            trailing_bytes: total_len % block_size,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    pub fn blocks(&self) -> impl Iterator<Item = BlockDescriptor> {
        let block_size = self.block_size;

        (0..self.block_count).map(move |index| BlockDescriptor {
            index,
            byte_offset: index * block_size,
        })
    }

    /// Byte range covered by a contiguous range of blocks.
    pub fn byte_range(&self, blocks: &Range<usize>) -> Range<usize> {
        blocks.start * self.block_size..blocks.end * self.block_size
    }

    /// Static split of the blocks into `workers` contiguous ranges of `ceil(blocks / workers)`
    /// blocks each. Trailing ranges are empty when there are fewer blocks than workers.
    pub fn worker_ranges(&self, workers: usize) -> Vec<Range<usize>> {
        let workers = workers.max(1);
        let per_worker = self.block_count.div_ceil(workers);

        (0..workers)
            .map(|i| {
                let start = usize::min(i * per_worker, self.block_count);
                let end = usize::min(start + per_worker, self.block_count);
                start..end
            })
            .collect()
    }
}
