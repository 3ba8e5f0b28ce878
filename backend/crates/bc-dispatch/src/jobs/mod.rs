pub mod job_queue;
pub mod job_runner;
