pub mod mock_sources;
