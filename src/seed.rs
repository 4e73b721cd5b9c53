use crate::database::{Database, DatabaseError};
use crate::models::NewLifeArea;

/// Default life areas inserted into a fresh database: (name, color, order)
const DEFAULT_LIFE_AREAS: [(&str, &str, i64); 5] = [
    ("Health", "#10B981", 1),
    ("Family", "#3B82F6", 2),
    ("Finance", "#F59E0B", 3),
    ("Learning", "#8B5CF6", 4),
    ("Community", "#EF4444", 5),
];

/// Populate a fresh database with the default life areas. Idempotent: if any
/// life area already exists the call is a no-op, so it is safe to run on
/// every startup. Invoked once by process initialization; the check and the
/// inserts run on the single process connection, so no two callers can both
/// pass the emptiness check.
pub fn seed(db: &Database) -> Result<(), DatabaseError> {
    if !db.life_areas().get_all()?.is_empty() {
        return Ok(());
    }

    for (name, color, order) in DEFAULT_LIFE_AREAS {
        db.life_areas().create(NewLifeArea {
            name: name.to_string(),
            color: color.to_string(),
            order,
        })?;
    }
    tracing::info!(count = DEFAULT_LIFE_AREAS.len(), "seeded default life areas");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_populates_the_five_defaults_in_order() {
        let db = Database::open_in_memory().unwrap();
        seed(&db).unwrap();

        let areas = db.life_areas().get_all().unwrap();
        let names: Vec<&str> = areas.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Health", "Family", "Finance", "Learning", "Community"]);
        assert_eq!(areas[0].color, "#10B981");
        assert_eq!(areas[0].order, 1);
    }

    #[test]
    fn seed_twice_leaves_exactly_five_areas() {
        let db = Database::open_in_memory().unwrap();
        seed(&db).unwrap();
        seed(&db).unwrap();
        assert_eq!(db.life_areas().get_all().unwrap().len(), 5);
    }

    #[test]
    fn seed_is_a_noop_when_any_area_exists() {
        let db = Database::open_in_memory().unwrap();
        db.life_areas()
            .create(NewLifeArea {
                name: "Custom".to_string(),
                color: "#000000".to_string(),
                order: 1,
            })
            .unwrap();

        seed(&db).unwrap();
        let areas = db.life_areas().get_all().unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].name, "Custom");
    }
}
