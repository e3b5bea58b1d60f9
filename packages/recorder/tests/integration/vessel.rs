use chrono::{Datelike, Utc};
use recorder::entity::{registration_history, vessel};
use recorder::manager::NewVessel;
use recorder::{Field, RecorderError};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{RegistrationFixture, TestDb};

fn imo(identifier: &str) -> NewVessel {
    NewVessel {
        identifier: identifier.to_string(),
        is_imo: true,
        built: Some(2007),
        draught: Some(8.0),
        length: Some(294),
        beam: Some(32),
    }
}

mod vessel_add {
    use super::*;

    #[tokio::test]
    async fn imo_vessel_is_added_without_registrations() {
        let app = TestDb::spawn().await;

        let details = app
            .recorder
            .vessels()
            .add(imo(" 9226 906 "))
            .await
            .expect("add should succeed");

        assert_eq!(details.vessel.identifier, "9226906");
        assert!(details.vessel.is_imo);
        assert_eq!(details.vessel.draught, Some(8.0));
        assert!(details.registrations.is_empty());
        assert!(details.active_registration().is_none());
    }

    #[tokio::test]
    async fn imo_must_be_seven_digits() {
        let app = TestDb::spawn().await;

        for identifier in ["922690", "92269061", "922690A"] {
            let err = app.recorder.vessels().add(imo(identifier)).await.unwrap_err();
            assert!(
                matches!(
                    err,
                    RecorderError::InvalidFormat {
                        field: Field::VesselIdentifier,
                        ..
                    }
                ),
                "{identifier} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn non_imo_identifier_may_contain_letters() {
        let app = TestDb::spawn().await;

        let details = app
            .recorder
            .vessels()
            .add(NewVessel {
                identifier: "eni 02334455".to_string(),
                ..Default::default()
            })
            .await
            .expect("non-IMO identifiers are alphanumeric");
        assert_eq!(details.vessel.identifier, "ENI02334455");
        assert!(!details.vessel.is_imo);
    }

    #[tokio::test]
    async fn out_of_range_dimensions_are_rejected() {
        let app = TestDb::spawn().await;
        let vessels = app.recorder.vessels();
        let next_year = Utc::now().year() + 1;

        let cases = [
            (NewVessel { built: Some(1899), ..imo("9226906") }, Field::YearBuilt),
            (NewVessel { built: Some(next_year), ..imo("9226906") }, Field::YearBuilt),
            (NewVessel { draught: Some(1.9), ..imo("9226906") }, Field::Draught),
            (NewVessel { length: Some(4), ..imo("9226906") }, Field::Length),
            (NewVessel { beam: Some(1), ..imo("9226906") }, Field::Beam),
        ];

        for (input, expected) in cases {
            let err = vessels.add(input).await.unwrap_err();
            match err {
                RecorderError::InvalidRange { field, .. } => assert_eq!(field, expected),
                other => panic!("expected InvalidRange for {expected}, got {other:?}"),
            }
        }

        let count = vessel::Entity::find().count(app.db()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn dimensions_are_optional() {
        let app = TestDb::spawn().await;

        let details = app
            .recorder
            .vessels()
            .add(NewVessel {
                identifier: "9226906".to_string(),
                is_imo: true,
                ..Default::default()
            })
            .await
            .expect("all dimensions may be null");
        assert_eq!(details.vessel.built, None);
    }

    #[tokio::test]
    async fn duplicate_identifier_is_rejected() {
        let app = TestDb::spawn().await;
        app.create_vessel("9226906").await;

        let err = app.recorder.vessels().add(imo("9226906")).await.unwrap_err();
        assert!(err.is_exists());
    }
}

mod vessel_update {
    use super::*;

    #[tokio::test]
    async fn update_changes_fields_and_keeps_history() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;
        fixture.register(&app, "Queen Victoria", "310459000").await;

        let details = app
            .recorder
            .vessels()
            .update(
                fixture.vessel_id,
                NewVessel {
                    draught: Some(8.5),
                    ..imo("9226906")
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(details.vessel.draught, Some(8.5));
        assert_eq!(details.registrations.len(), 1);
        assert_eq!(
            details
                .active_registration()
                .expect("registration is active")
                .registration
                .name,
            "Queen Victoria"
        );
    }

    #[tokio::test]
    async fn identifier_of_another_vessel_is_rejected() {
        let app = TestDb::spawn().await;
        app.create_vessel("9226906").await;
        let id = app.create_vessel("9169524").await;

        let err = app
            .recorder
            .vessels()
            .update(id, imo("9226906"))
            .await
            .unwrap_err();
        assert!(err.is_exists());
    }

    #[tokio::test]
    async fn unknown_vessel_is_not_found() {
        let app = TestDb::spawn().await;

        let err = app
            .recorder
            .vessels()
            .update(5, imo("9226906"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

mod vessel_delete {
    use super::*;

    #[tokio::test]
    async fn delete_with_registration_history_is_rejected() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;
        fixture.register(&app, "Queen Victoria", "310459000").await;
        fixture.register(&app, "Arcadia", "000954013").await;

        let err = app
            .recorder
            .vessels()
            .delete(fixture.vessel_id)
            .await
            .unwrap_err();
        assert!(err.is_in_use());

        let remaining = registration_history::Entity::find()
            .filter(registration_history::Column::VesselId.eq(fixture.vessel_id))
            .count(app.db())
            .await
            .unwrap();
        assert_eq!(remaining, 2);
        assert!(
            app.recorder
                .vessels()
                .get_one(vessel::Column::Id.eq(fixture.vessel_id))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn delete_unregistered_vessel() {
        let app = TestDb::spawn().await;
        let id = app.create_vessel("9169524").await;

        app.recorder.vessels().delete(id).await.unwrap();

        let count = vessel::Entity::find().count(app.db()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn unknown_vessel_is_not_found() {
        let app = TestDb::spawn().await;

        let err = app.recorder.vessels().delete(11).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

#[tokio::test]
async fn list_orders_by_identifier_and_attaches_history() {
    let app = TestDb::spawn().await;
    let fixture = RegistrationFixture::create(&app, "9226906").await;
    fixture.register(&app, "Queen Victoria", "310459000").await;
    app.create_vessel("9169524").await;
    app.create_vessel("9383936").await;

    let vessels = app
        .recorder
        .vessels()
        .list(Condition::all(), 1, 10)
        .await
        .unwrap();

    let identifiers: Vec<&str> = vessels.iter().map(|v| v.vessel.identifier.as_str()).collect();
    assert_eq!(identifiers, ["9169524", "9226906", "9383936"]);
    assert_eq!(vessels[1].registrations.len(), 1);
    assert!(vessels[0].registrations.is_empty());
}

#[tokio::test]
async fn add_if_not_exists_matches_clean_identifier() {
    let app = TestDb::spawn().await;
    let vessels = app.recorder.vessels();

    let first = vessels.add_if_not_exists(imo("9226906")).await.unwrap();
    let second = vessels.add_if_not_exists(imo(" 9226906 ")).await.unwrap();

    assert_eq!(first.vessel, second.vessel);
    let count = vessel::Entity::find().count(app.db()).await.unwrap();
    assert_eq!(count, 1);
}
