mod failures;
mod faceting;
mod paging;
mod restrictions;
