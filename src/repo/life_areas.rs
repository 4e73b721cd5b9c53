use rusqlite::OptionalExtension;

use crate::database::{Database, DatabaseError};
use crate::models::{LifeArea, LifeAreaPatch, NewLifeArea};
use crate::utils::now_stamp;

/// Repository for life areas, the root grouping entity. Listing order is
/// always `order` ascending.
pub struct LifeAreas<'a> {
    db: &'a Database,
}

impl<'a> LifeAreas<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn row_to_area(row: &rusqlite::Row) -> Result<LifeArea, rusqlite::Error> {
        Ok(LifeArea {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            order: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// Get all life areas ordered by "order" ASC
    pub fn get_all(&self) -> Result<Vec<LifeArea>, DatabaseError> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, name, color, \"order\", created_at, updated_at
             FROM life_areas ORDER BY \"order\" ASC",
        )?;
        let areas = stmt
            .query_map([], Self::row_to_area)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(areas)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<LifeArea>, DatabaseError> {
        self.db
            .conn()
            .query_row(
                "SELECT id, name, color, \"order\", created_at, updated_at
                 FROM life_areas WHERE id = ?1",
                [id],
                Self::row_to_area,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Insert a new life area with a fresh id and creation timestamps
    pub fn create(&self, input: NewLifeArea) -> Result<LifeArea, DatabaseError> {
        let area = LifeArea::new(input);
        self.db.conn().execute(
            "INSERT INTO life_areas (id, name, color, \"order\", created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                area.id,
                area.name,
                area.color,
                area.order,
                area.created_at,
                area.updated_at
            ],
        )?;
        Ok(area)
    }

    /// Merge a partial update onto an existing life area.
    /// Fails with NotFound if the id is absent.
    pub fn update(&self, id: &str, patch: LifeAreaPatch) -> Result<LifeArea, DatabaseError> {
        let mut area = self.get_by_id(id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "LifeArea",
            id: id.to_string(),
        })?;

        if let Some(name) = patch.name {
            area.name = name;
        }
        if let Some(color) = patch.color {
            area.color = color;
        }
        if let Some(order) = patch.order {
            area.order = order;
        }
        area.updated_at = now_stamp();

        self.db.conn().execute(
            "UPDATE life_areas SET name = ?1, color = ?2, \"order\" = ?3, updated_at = ?4
             WHERE id = ?5",
            rusqlite::params![area.name, area.color, area.order, area.updated_at, area.id],
        )?;
        Ok(area)
    }

    /// Delete a life area by id. Idempotent; deleting a nonexistent id is not
    /// an error. Callers must first check that no goal or task still
    /// references the area.
    pub fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        self.db
            .conn()
            .execute("DELETE FROM life_areas WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Reorder two life areas by exchanging their "order" values, the
    /// pairwise-swap primitive behind move-up/move-down
    pub fn swap_order(&self, first_id: &str, second_id: &str) -> Result<(), DatabaseError> {
        let first = self
            .get_by_id(first_id)?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "LifeArea",
                id: first_id.to_string(),
            })?;
        let second = self
            .get_by_id(second_id)?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "LifeArea",
                id: second_id.to_string(),
            })?;

        self.update(
            first_id,
            LifeAreaPatch {
                order: Some(second.order),
                ..Default::default()
            },
        )?;
        self.update(
            second_id,
            LifeAreaPatch {
                order: Some(first.order),
                ..Default::default()
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_area(db: &Database, name: &str, order: i64) -> LifeArea {
        db.life_areas()
            .create(NewLifeArea {
                name: name.to_string(),
                color: "#10B981".to_string(),
                order,
            })
            .unwrap()
    }

    #[test]
    fn create_then_get_by_id_round_trips() {
        let db = Database::open_in_memory().unwrap();
        let area = sample_area(&db, "Health", 1);

        let found = db.life_areas().get_by_id(&area.id).unwrap();
        assert_eq!(found, Some(area));
    }

    #[test]
    fn get_by_id_returns_none_for_unknown_id() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.life_areas().get_by_id("nope").unwrap(), None);
    }

    #[test]
    fn get_all_sorts_by_order_ascending() {
        let db = Database::open_in_memory().unwrap();
        sample_area(&db, "Finance", 3);
        sample_area(&db, "Health", 1);
        sample_area(&db, "Family", 2);

        let names: Vec<String> = db
            .life_areas()
            .get_all()
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["Health", "Family", "Finance"]);
    }

    #[test]
    fn update_merges_patch_and_advances_updated_at() {
        let db = Database::open_in_memory().unwrap();
        let area = sample_area(&db, "Health", 1);

        let updated = db
            .life_areas()
            .update(
                &area.id,
                LifeAreaPatch {
                    name: Some("Wellness".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Wellness");
        assert_eq!(updated.color, area.color);
        assert_eq!(updated.order, area.order);
        assert_eq!(updated.id, area.id);
        assert_eq!(updated.created_at, area.created_at);
        assert!(updated.updated_at >= area.updated_at);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .life_areas()
            .update("missing", LifeAreaPatch::default())
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn delete_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let area = sample_area(&db, "Health", 1);

        db.life_areas().delete(&area.id).unwrap();
        assert_eq!(db.life_areas().get_by_id(&area.id).unwrap(), None);
        // A second delete of the same id succeeds
        db.life_areas().delete(&area.id).unwrap();
    }

    #[test]
    fn swap_order_exchanges_exactly_the_two_targets() {
        let db = Database::open_in_memory().unwrap();
        let health = sample_area(&db, "Health", 1);
        let family = sample_area(&db, "Family", 2);
        let finance = sample_area(&db, "Finance", 3);

        db.life_areas().swap_order(&health.id, &family.id).unwrap();

        let areas = db.life_areas().get_all().unwrap();
        let mut orders: Vec<i64> = areas.iter().map(|a| a.order).collect();
        orders.sort();
        // The multiset of order values is preserved
        assert_eq!(orders, [1, 2, 3]);

        let by_name = |name: &str| areas.iter().find(|a| a.name == name).unwrap().order;
        assert_eq!(by_name("Health"), 2);
        assert_eq!(by_name("Family"), 1);
        assert_eq!(by_name("Finance"), finance.order);
    }
}
