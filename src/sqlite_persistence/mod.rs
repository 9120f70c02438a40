mod versioned_schema;

pub use versioned_schema::{
    is_unique_violation, open_versioned_db, Column, ForeignKey, ForeignKeyOnChange, SqlType,
    Table, VersionedSchema, BASE_DB_VERSION, DEFAULT_TIMESTAMP,
};
