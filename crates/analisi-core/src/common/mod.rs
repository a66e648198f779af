pub mod array;
pub mod type_ids;

pub use array::{ArrayData, NumericArray, ShapeError};
pub use type_ids::{TypeIdMapping, types_id_array};
