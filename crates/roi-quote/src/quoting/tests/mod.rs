mod common;
mod estimate;
mod service;
mod vendor;
