pub mod config;
pub mod logging;

pub mod checksum;
pub mod crawler;
pub mod credentials;
pub mod downloader;
pub mod driver;
pub mod integrity;
pub mod manifest;
pub mod model;
pub mod planner;
pub mod reconcile;
pub mod retry;
pub mod storage;
pub mod transport;
pub mod units;
pub mod url_model;
