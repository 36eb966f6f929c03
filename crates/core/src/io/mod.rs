//! CSV adapters for the resampler input and the presenter outputs

mod csv_io;

pub use csv_io::{
    read_ndvi_csv, read_ndvi_from_reader, write_baselines_csv, write_baselines_to_writer,
    write_events_csv, write_events_to_writer, write_metrics_csv, write_metrics_to_writer,
};
