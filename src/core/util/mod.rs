pub mod cost_util;
pub mod duration_util;
pub mod vector_util;
