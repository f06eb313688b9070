pub mod partitioned_writer;

pub use partitioned_writer::{OutputSummary, PartitionedParquetWriter};
