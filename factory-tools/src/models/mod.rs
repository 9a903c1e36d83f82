mod column;
mod identity;
mod model;
mod table_name;

pub use column::*;
pub use identity::*;
pub use model::*;
pub use table_name::*;
