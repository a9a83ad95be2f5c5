pub mod fastq;
pub mod http;
pub mod unarchiving;
pub mod workflow;
