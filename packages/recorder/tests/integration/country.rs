use recorder::entity::country;
use recorder::{EntityKind, Field, RecorderError};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait};

use crate::common::TestDb;

mod country_add {
    use super::*;

    #[tokio::test]
    async fn code_is_cleaned_and_uppercased() {
        let app = TestDb::spawn().await;

        let country = app
            .recorder
            .countries()
            .add(" g b ", "  United   Kingdom ")
            .await
            .expect("add should succeed");

        assert_eq!(country.code, "GB");
        assert_eq!(country.name, "United Kingdom");
    }

    #[tokio::test]
    async fn one_letter_code_is_rejected_without_insert() {
        let app = TestDb::spawn().await;

        let err = app
            .recorder
            .countries()
            .add("G", "United Kingdom")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RecorderError::InvalidFormat {
                field: Field::CountryCode,
                ..
            }
        ));
        let count = country::Entity::find().count(app.db()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn non_alpha_code_is_rejected() {
        let app = TestDb::spawn().await;

        let err = app.recorder.countries().add("G1", "Nowhere").await.unwrap_err();
        assert!(matches!(err, RecorderError::InvalidFormat { .. }));
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected() {
        let app = TestDb::spawn().await;
        app.create_country("GB", "United Kingdom").await;

        let err = app
            .recorder
            .countries()
            .add("gb", "Great Britain")
            .await
            .unwrap_err();

        match err {
            RecorderError::Exists { entity, key } => {
                assert_eq!(entity, EntityKind::Country);
                assert_eq!(key, "GB");
            }
            other => panic!("expected Exists, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let app = TestDb::spawn().await;
        app.create_country("GB", "United Kingdom").await;

        let err = app
            .recorder
            .countries()
            .add("UK", "United Kingdom")
            .await
            .unwrap_err();
        assert!(err.is_exists());
    }
}

mod country_add_if_not_exists {
    use super::*;

    #[tokio::test]
    async fn second_call_returns_the_same_row() {
        let app = TestDb::spawn().await;
        let countries = app.recorder.countries();

        let first = countries
            .add_if_not_exists("FR", "France")
            .await
            .expect("first call should add");
        let second = countries
            .add_if_not_exists(" fr", "France")
            .await
            .expect("second call should find");

        assert_eq!(first, second);
        let count = country::Entity::find().count(app.db()).await.unwrap();
        assert_eq!(count, 1);
    }
}

mod country_update {
    use super::*;

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestDb::spawn().await;

        let err = app
            .recorder
            .countries()
            .update(42, "GB", "United Kingdom")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RecorderError::NotFound {
                entity: EntityKind::Country,
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn keeping_own_code_is_not_a_duplicate() {
        let app = TestDb::spawn().await;
        let id = app.create_country("GB", "Britain").await;

        let updated = app
            .recorder
            .countries()
            .update(id, "GB", "United Kingdom")
            .await
            .expect("update should succeed");

        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "United Kingdom");
    }

    #[tokio::test]
    async fn taking_another_rows_code_is_rejected() {
        let app = TestDb::spawn().await;
        app.create_country("GB", "United Kingdom").await;
        let id = app.create_country("FR", "France").await;

        let err = app
            .recorder
            .countries()
            .update(id, "GB", "France")
            .await
            .unwrap_err();
        assert!(err.is_exists());

        let unchanged = app
            .recorder
            .countries()
            .get_one(country::Column::Id.eq(id))
            .await
            .unwrap()
            .expect("country should still exist");
        assert_eq!(unchanged.code, "FR");
    }
}

mod country_delete {
    use super::*;

    #[tokio::test]
    async fn delete_removes_row() {
        let app = TestDb::spawn().await;
        let id = app.create_country("GB", "United Kingdom").await;

        app.recorder.countries().delete(id).await.unwrap();

        let found = app
            .recorder
            .countries()
            .get_one(country::Column::Id.eq(id))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestDb::spawn().await;

        let err = app.recorder.countries().delete(7).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

mod country_list {
    use super::*;

    async fn seed(app: &TestDb) {
        for (code, name) in [
            ("NO", "Norway"),
            ("BE", "Belgium"),
            ("GB", "United Kingdom"),
            ("DE", "Germany"),
            ("FR", "France"),
        ] {
            app.create_country(code, name).await;
        }
    }

    fn names(countries: &[country::Model]) -> Vec<&str> {
        countries.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn pages_follow_name_order() {
        let app = TestDb::spawn().await;
        seed(&app).await;
        let countries = app.recorder.countries();

        let first = countries.list(Condition::all(), 1, 2).await.unwrap();
        let second = countries.list(Condition::all(), 2, 2).await.unwrap();
        let third = countries.list(Condition::all(), 3, 2).await.unwrap();

        assert_eq!(names(&first), ["Belgium", "France"]);
        assert_eq!(names(&second), ["Germany", "Norway"]);
        assert_eq!(names(&third), ["United Kingdom"]);
    }

    #[tokio::test]
    async fn page_beyond_end_is_empty() {
        let app = TestDb::spawn().await;
        seed(&app).await;

        let page = app
            .recorder
            .countries()
            .list(Condition::all(), 4, 2)
            .await
            .expect("page past the end is not an error");
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn unbounded_page_size_returns_everything() {
        let app = TestDb::spawn().await;
        seed(&app).await;

        let all = app
            .recorder
            .countries()
            .list(Condition::all(), 1, u64::MAX)
            .await
            .unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn unbounded_second_page_is_empty() {
        let app = TestDb::spawn().await;
        seed(&app).await;

        let rest = app
            .recorder
            .countries()
            .list(Condition::all(), 2, u64::MAX)
            .await
            .expect("second unbounded page should be queryable");
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn filter_is_applied_before_paging() {
        let app = TestDb::spawn().await;
        seed(&app).await;

        let filtered = app
            .recorder
            .countries()
            .list(country::Column::Code.is_in(["GB", "FR", "NO"]), 2, 2)
            .await
            .unwrap();
        assert_eq!(names(&filtered), ["United Kingdom"]);
    }

    #[tokio::test]
    async fn get_one_takes_first_in_list_order() {
        let app = TestDb::spawn().await;
        seed(&app).await;

        let first = app
            .recorder
            .countries()
            .get_one(Condition::all())
            .await
            .unwrap()
            .expect("there are countries");
        assert_eq!(first.name, "Belgium");
    }
}
