pub mod data_source;
pub use data_source::DataSource;
pub mod sql_source;
pub use sql_source::SqlDataSource;
pub mod mock_source;
pub use mock_source::MockDataSource;
pub mod remote_source;
pub use remote_source::RemoteDataSource;
