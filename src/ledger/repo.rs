use sqlx::SqlitePool;
use time::Date;

use super::{DailyTotals, MealRecord, NewMeal};

/// Insert the record verbatim and return the assigned id.
pub async fn append(db: &SqlitePool, meal: &NewMeal) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO meals
            (log_date, meal_name, logged_at, serving, calories, protein_g, carbs_g, fat_g, fiber_g, sugar_g)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(meal.log_date)
    .bind(&meal.meal_name)
    .bind(&meal.logged_at)
    .bind(&meal.serving)
    .bind(meal.calories)
    .bind(meal.protein_g)
    .bind(meal.carbs_g)
    .bind(meal.fat_g)
    .bind(meal.fiber_g)
    .bind(meal.sugar_g)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All meals logged on `date`, insertion order (id ascending). An empty
/// day is an empty vec, never an error.
pub async fn list_for_date(db: &SqlitePool, date: Date) -> Result<Vec<MealRecord>, sqlx::Error> {
    sqlx::query_as::<_, MealRecord>(
        r#"
        SELECT id, log_date, meal_name, logged_at, serving,
               calories, protein_g, carbs_g, fat_g, fiber_g, sugar_g
        FROM meals
        WHERE log_date = ?
        ORDER BY id ASC
        "#,
    )
    .bind(date)
    .fetch_all(db)
    .await
}

/// Remove a meal by id. Deleting an id that is not there is a no-op.
pub async fn delete(db: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM meals WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Field-wise sum of the day's macros; all zero when nothing is logged.
pub async fn sum_for_date(db: &SqlitePool, date: Date) -> Result<DailyTotals, sqlx::Error> {
    sqlx::query_as::<_, DailyTotals>(
        r#"
        SELECT COALESCE(SUM(calories), 0.0)  AS calories,
               COALESCE(SUM(protein_g), 0.0) AS protein_g,
               COALESCE(SUM(carbs_g), 0.0)   AS carbs_g,
               COALESCE(SUM(fat_g), 0.0)     AS fat_g
        FROM meals
        WHERE log_date = ?
        "#,
    )
    .bind(date)
    .fetch_one(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use time::macros::date;

    async fn pool() -> SqlitePool {
        let pool = db::test_pool().await;
        db::initialize(&pool).await.expect("migrations");
        pool
    }

    fn meal(name: &str, on: Date, calories: f64) -> NewMeal {
        NewMeal {
            log_date: on,
            meal_name: name.to_owned(),
            logged_at: "12:30".to_owned(),
            serving: Some("1 plate".to_owned()),
            calories,
            protein_g: 20.0,
            carbs_g: 35.0,
            fat_g: 10.0,
            fiber_g: 4.0,
            sugar_g: 6.0,
        }
    }

    #[tokio::test]
    async fn append_then_list_round_trips() {
        let pool = pool().await;
        let input = meal("Ramen", date!(2024 - 01 - 01), 550.0);

        let id = append(&pool, &input).await.unwrap();
        let listed = list_for_date(&pool, date!(2024 - 01 - 01)).await.unwrap();

        assert_eq!(listed, vec![input.into_record(id)]);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id_and_scoped_to_the_day() {
        let pool = pool().await;
        let day = date!(2024 - 01 - 01);
        append(&pool, &meal("Breakfast", day, 300.0)).await.unwrap();
        append(&pool, &meal("Other day", date!(2024 - 01 - 02), 999.0))
            .await
            .unwrap();
        append(&pool, &meal("Lunch", day, 450.0)).await.unwrap();

        let names: Vec<String> = list_for_date(&pool, day)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.meal_name)
            .collect();
        assert_eq!(names, vec!["Breakfast", "Lunch"]);
    }

    #[tokio::test]
    async fn empty_day_lists_nothing_and_sums_to_zero() {
        let pool = pool().await;
        let day = date!(2030 - 06 - 15);

        assert!(list_for_date(&pool, day).await.unwrap().is_empty());
        let totals = sum_for_date(&pool, day).await.unwrap();
        assert_eq!(
            totals,
            DailyTotals {
                calories: 0.0,
                protein_g: 0.0,
                carbs_g: 0.0,
                fat_g: 0.0
            }
        );
    }

    #[tokio::test]
    async fn sums_then_delete_midday_meal() {
        let pool = pool().await;
        let day = date!(2024 - 01 - 01);
        append(&pool, &meal("Breakfast", day, 300.0)).await.unwrap();
        let lunch_id = append(&pool, &meal("Lunch", day, 450.0)).await.unwrap();
        append(&pool, &meal("Snack", day, 220.0)).await.unwrap();

        let totals = sum_for_date(&pool, day).await.unwrap();
        assert_eq!(totals.calories, 970.0);

        delete(&pool, lunch_id).await.unwrap();
        let totals = sum_for_date(&pool, day).await.unwrap();
        assert_eq!(totals.calories, 520.0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let pool = pool().await;
        let day = date!(2024 - 01 - 01);
        let id = append(&pool, &meal("Dinner", day, 600.0)).await.unwrap();

        delete(&pool, id).await.unwrap();
        let after_first = list_for_date(&pool, day).await.unwrap();

        delete(&pool, id).await.unwrap();
        delete(&pool, 424_242).await.unwrap();
        let after_again = list_for_date(&pool, day).await.unwrap();

        assert_eq!(after_first, after_again);
        assert!(after_again.is_empty());
    }

    #[tokio::test]
    async fn totals_match_field_wise_sums() {
        let pool = pool().await;
        let day = date!(2024 - 02 - 02);
        let meals = [
            meal("A", day, 310.0),
            meal("B", day, 125.5),
            meal("C", day, 480.25),
        ];
        for m in &meals {
            append(&pool, m).await.unwrap();
        }

        let totals = sum_for_date(&pool, day).await.unwrap();
        assert!((totals.calories - 915.75).abs() < 1e-9);
        assert!((totals.protein_g - 60.0).abs() < 1e-9);
        assert!((totals.carbs_g - 105.0).abs() < 1e-9);
        assert!((totals.fat_g - 30.0).abs() < 1e-9);
    }
}
