use super::test_helpers::*;
use super::*;
use crate::error::ErrorKind;
use crate::events::MemorySink;
use crate::types::{ContentItem, Floor, Image};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod crawl;
