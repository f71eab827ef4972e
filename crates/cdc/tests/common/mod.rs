// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use cqlcdc_cdc::TableLayout;
use cqlcdc_type::{ColumnType, Timestamp};
use uuid::Uuid;

pub const TABLE_ID: &str = "5a1c395e-b41f-11e5-9f22-ba0be0483c18";

pub fn table_id() -> Uuid {
	Uuid::parse_str(TABLE_ID).unwrap()
}

/// `CREATE TABLE ks.tbl (key text PRIMARY KEY, col1 int, col2 map<text, int>)`
pub fn simple_table() -> TableLayout {
	TableLayout::new("ks", "tbl", table_id()).with_partition_key("key", ColumnType::Text)
}

/// `PRIMARY KEY ((key1, key2), cluster1, cluster2)`
pub fn clustering_table() -> TableLayout {
	TableLayout::new("ks", "clustering_table", table_id())
		.with_partition_key("key1", ColumnType::Text)
		.with_partition_key("key2", ColumnType::Int)
		.with_clustering("cluster1", ColumnType::Int)
		.with_clustering("cluster2", ColumnType::Int)
}

pub fn ms(millis: i64) -> Timestamp {
	Timestamp::from_millis(millis)
}
