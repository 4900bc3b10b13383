mod completeness;
mod stress;
mod traits;
