pub mod check;
pub mod new;
pub mod schema;
pub mod sort;
pub mod sync;
pub mod translations;
