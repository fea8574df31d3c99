//! News-search client (NewsAPI.org).

mod newsapi;

pub use newsapi::{
    format_headlines, Article, NewsClient, NewsError, NEWS_EMPTY_REPLY, NEWS_ERROR_REPLY,
    NEWS_NOT_CONFIGURED_REPLY,
};
