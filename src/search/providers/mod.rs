pub mod tavily;

pub use tavily::TavilySearchProvider;
