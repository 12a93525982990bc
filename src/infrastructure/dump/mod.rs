pub mod file_dumper;

pub use file_dumper::FileDumper;
