#![allow(dead_code)]

pub mod caption_source;
pub mod feed;
pub mod summarizer;
