pub mod page_extractor;

pub use page_extractor::{
    heading_hierarchy_ok, is_external_href, is_internal_href, ExtractedHeading, ExtractedImage,
    ExtractedLink, PageExtractor,
};
