//! 数据模型层

pub mod edit_history;
pub mod edit_op;
pub mod schema;
pub mod transfer;
pub mod value_path;

pub use edit_history::{UndoTrack, UndoTrackConfig, DEFAULT_UNDO_LIMIT};
pub use edit_op::{EditError, UndoableEdit};
pub use schema::{
    find_patterned_schema_for, get_additional_property_schemas, get_expanded_type_of,
    get_property_name_error, get_property_schemas, is_flag_or_object, is_object, item_schema,
    resolve_property_schema, ObjectSchemaResolver, PatternedSchema, PropertyNameError,
    SchemaError,
};
pub use transfer::{create_transfer_action, TransferSession};
pub use value_path::{ArrayElementRef, PropertyRef, ValueLocation, ValuePath};
