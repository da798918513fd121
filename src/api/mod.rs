pub mod av;
pub mod av_dto;
pub mod cache;
pub mod fmp;
pub mod fmp_dto;
pub mod utils;
