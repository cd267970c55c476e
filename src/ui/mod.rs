/// UI module exports
pub mod popup;
pub mod saved_list;
