//! Row mappings for todo lists and standalone todo items.

use super::SqliteEntity;
use crate::model::todo_item::{Importance, TodoItem};
use crate::model::todo_list::TodoList;
use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;

const LIST_SELECT_SQL: &str = "SELECT
    id,
    revision,
    is_dirty,
    last_updated_by,
    last_updated_on
FROM todo_lists
ORDER BY position ASC, id ASC;";

const LIST_ITEM_SELECT_SQL: &str = "SELECT
    list_id,
    id,
    text,
    importance,
    deadline,
    is_done,
    created_on,
    changed_on
FROM todo_list_items
ORDER BY list_id ASC, position ASC;";

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    text,
    importance,
    deadline,
    is_done,
    created_on,
    changed_on
FROM todo_items
ORDER BY position ASC, id ASC;";

impl SqliteEntity for TodoList {
    const TABLE: &'static str = "todo_lists";

    fn select_all(conn: &Connection) -> StoreResult<Vec<Self>> {
        let mut items_by_list: HashMap<String, Vec<TodoItem>> = HashMap::new();
        {
            let mut stmt = conn.prepare(LIST_ITEM_SELECT_SQL)?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let list_id: String = row.get("list_id")?;
                let item = parse_item_row(row, "todo_list_items")?;
                items_by_list.entry(list_id).or_default().push(item);
            }
        }

        let mut stmt = conn.prepare(LIST_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            let mut list = parse_list_row(row)?;
            list.items = items_by_list.remove(&list.id).unwrap_or_default();
            lists.push(list);
        }

        Ok(lists)
    }

    fn write_row(conn: &Connection, list: &Self, position: i64) -> StoreResult<()> {
        conn.execute(
            "INSERT INTO todo_lists (
                id,
                position,
                revision,
                is_dirty,
                last_updated_by,
                last_updated_on
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                position = excluded.position,
                revision = excluded.revision,
                is_dirty = excluded.is_dirty,
                last_updated_by = excluded.last_updated_by,
                last_updated_on = excluded.last_updated_on;",
            params![
                list.id.as_str(),
                position,
                list.revision,
                bool_to_int(list.is_dirty),
                list.last_updated_by.as_str(),
                timestamp_to_db(&list.last_updated_on),
            ],
        )?;

        conn.execute(
            "DELETE FROM todo_list_items WHERE list_id = ?1;",
            [list.id.as_str()],
        )?;

        for (item_position, item) in list.items.iter().enumerate() {
            conn.execute(
                "INSERT INTO todo_list_items (
                    list_id,
                    id,
                    position,
                    text,
                    importance,
                    deadline,
                    is_done,
                    created_on,
                    changed_on
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    list.id.as_str(),
                    item.id.as_str(),
                    item_position as i64,
                    item.text.as_str(),
                    item.importance.as_str(),
                    item.deadline.as_ref().map(timestamp_to_db),
                    bool_to_int(item.is_done),
                    timestamp_to_db(&item.created_on),
                    item.changed_on.as_ref().map(timestamp_to_db),
                ],
            )?;
        }

        Ok(())
    }
}

impl SqliteEntity for TodoItem {
    const TABLE: &'static str = "todo_items";

    fn select_all(conn: &Connection) -> StoreResult<Vec<Self>> {
        let mut stmt = conn.prepare(ITEM_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row, "todo_items")?);
        }
        Ok(items)
    }

    fn write_row(conn: &Connection, item: &Self, position: i64) -> StoreResult<()> {
        conn.execute(
            "INSERT INTO todo_items (
                id,
                position,
                text,
                importance,
                deadline,
                is_done,
                created_on,
                changed_on
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                position = excluded.position,
                text = excluded.text,
                importance = excluded.importance,
                deadline = excluded.deadline,
                is_done = excluded.is_done,
                created_on = excluded.created_on,
                changed_on = excluded.changed_on;",
            params![
                item.id.as_str(),
                position,
                item.text.as_str(),
                item.importance.as_str(),
                item.deadline.as_ref().map(timestamp_to_db),
                bool_to_int(item.is_done),
                timestamp_to_db(&item.created_on),
                item.changed_on.as_ref().map(timestamp_to_db),
            ],
        )?;
        Ok(())
    }
}

fn parse_list_row(row: &Row<'_>) -> StoreResult<TodoList> {
    let last_updated_on: String = row.get("last_updated_on")?;
    Ok(TodoList {
        id: row.get("id")?,
        items: Vec::new(),
        revision: row.get("revision")?,
        is_dirty: int_to_bool(row.get("is_dirty")?, "todo_lists.is_dirty")?,
        last_updated_by: row.get("last_updated_by")?,
        last_updated_on: parse_timestamp(&last_updated_on, "todo_lists.last_updated_on")?,
    })
}

fn parse_item_row(row: &Row<'_>, table: &str) -> StoreResult<TodoItem> {
    let importance_text: String = row.get("importance")?;
    let importance = Importance::parse(&importance_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid importance `{importance_text}` in {table}.importance"
        ))
    })?;

    let deadline = match row.get::<_, Option<String>>("deadline")? {
        Some(value) => Some(parse_timestamp(&value, &format!("{table}.deadline"))?),
        None => None,
    };
    let changed_on = match row.get::<_, Option<String>>("changed_on")? {
        Some(value) => Some(parse_timestamp(&value, &format!("{table}.changed_on"))?),
        None => None,
    };
    let created_on: String = row.get("created_on")?;

    Ok(TodoItem {
        id: row.get("id")?,
        text: row.get("text")?,
        importance,
        deadline,
        is_done: int_to_bool(row.get("is_done")?, &format!("{table}.is_done"))?,
        created_on: parse_timestamp(&created_on, &format!("{table}.created_on"))?,
        changed_on,
    })
}

fn timestamp_to_db(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str, column: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
