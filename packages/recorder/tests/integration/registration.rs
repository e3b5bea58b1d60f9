use recorder::entity::registration_history;
use recorder::{EntityKind, RecorderError};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{RegistrationFixture, TestDb};

async fn active_count(app: &TestDb, vessel_id: i32) -> u64 {
    registration_history::Entity::find()
        .filter(registration_history::Column::VesselId.eq(vessel_id))
        .filter(registration_history::Column::IsActive.eq(true))
        .count(app.db())
        .await
        .expect("Failed to count active registrations")
}

mod registration_add {
    use super::*;

    #[tokio::test]
    async fn first_registration_is_active_with_lookups() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;

        let details = fixture.register(&app, "Queen Victoria", " 310 459 000 ").await;

        assert!(details.registration.is_active);
        assert_eq!(details.registration.mmsi, "310459000");
        assert_eq!(details.registration.callsign, "ZCEF6");
        assert_eq!(details.flag.expect("flag attached").code, "BM");
        assert_eq!(
            details.vessel_type.expect("type attached").name,
            "Passenger (Cruise) Ship"
        );
        assert_eq!(details.operator.expect("operator attached").name, "Cunard Line");
        assert_eq!(active_count(&app, fixture.vessel_id).await, 1);
    }

    #[tokio::test]
    async fn new_registration_supersedes_previous() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;

        let first = fixture.register(&app, "Queen Victoria", "310459000").await;
        let second = fixture.register(&app, "Arcadia", "000954013").await;

        assert!(second.registration.is_active);
        assert_eq!(active_count(&app, fixture.vessel_id).await, 1);

        let registrations = app.recorder.registrations();
        let current = registrations
            .get_one(
                Condition::all()
                    .add(registration_history::Column::VesselId.eq(fixture.vessel_id))
                    .add(registration_history::Column::IsActive.eq(true)),
            )
            .await
            .unwrap()
            .expect("vessel has an active registration");
        assert_eq!(current.registration.name, "Arcadia");
        assert_eq!(current.registration.id, second.registration.id);

        let old = registrations
            .get_one(registration_history::Column::Id.eq(first.registration.id))
            .await
            .unwrap()
            .expect("history is retained");
        assert!(!old.registration.is_active);
    }

    #[tokio::test]
    async fn other_vessels_are_untouched() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;
        let other_vessel = app.create_vessel("9169524").await;

        fixture.register(&app, "Queen Victoria", "310459000").await;
        let mut other = fixture.registration("Queen Mary 2", "310627000");
        other.vessel_id = other_vessel;
        app.recorder.registrations().add(other).await.unwrap();

        assert_eq!(active_count(&app, fixture.vessel_id).await, 1);
        assert_eq!(active_count(&app, other_vessel).await, 1);
    }

    #[tokio::test]
    async fn invalid_mmsi_is_rejected_without_changes() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;
        let existing = fixture.register(&app, "Queen Victoria", "310459000").await;

        for mmsi in ["31045900", "3104590001", "31045900X"] {
            let err = app
                .recorder
                .registrations()
                .add(fixture.registration("Arcadia", mmsi))
                .await
                .unwrap_err();
            assert!(matches!(err, RecorderError::InvalidMmsi(_)), "{mmsi}");
        }

        let current = app
            .recorder
            .registrations()
            .active_for(fixture.vessel_id)
            .await
            .unwrap()
            .expect("previous registration still active");
        assert_eq!(current.registration.id, existing.registration.id);
    }

    #[tokio::test]
    async fn unknown_vessel_is_not_found() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;
        let mut registration = fixture.registration("Ghost", "310459000");
        registration.vessel_id = 404;

        let err = app
            .recorder
            .registrations()
            .add(registration)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecorderError::NotFound {
                entity: EntityKind::Vessel,
                id: 404
            }
        ));

        let count = registration_history::Entity::find()
            .count(app.db())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn concurrent_registrations_leave_one_active() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;
        let registrations = app.recorder.registrations();

        let (a, b, c) = tokio::join!(
            registrations.add(fixture.registration("Queen Victoria", "310459000")),
            registrations.add(fixture.registration("Arcadia", "000954013")),
            registrations.add(fixture.registration("Aurora", "310111000")),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        assert_eq!(active_count(&app, fixture.vessel_id).await, 1);
        let all = registrations
            .list(
                registration_history::Column::VesselId.eq(fixture.vessel_id),
                1,
                u64::MAX,
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }
}

mod registration_deactivate {
    use super::*;

    #[tokio::test]
    async fn deactivate_leaves_vessel_without_active_registration() {
        let app = TestDb::spawn().await;
        let fixture = RegistrationFixture::create(&app, "9226906").await;
        let first = fixture.register(&app, "Queen Victoria", "310459000").await;
        let second = fixture.register(&app, "Arcadia", "000954013").await;

        app.recorder
            .registrations()
            .deactivate(second.registration.id)
            .await
            .unwrap();

        assert_eq!(active_count(&app, fixture.vessel_id).await, 0);
        let old = app
            .recorder
            .registrations()
            .get_one(registration_history::Column::Id.eq(first.registration.id))
            .await
            .unwrap()
            .expect("history is retained");
        assert!(!old.registration.is_active, "older rows are not reactivated");
    }

    #[tokio::test]
    async fn unknown_registration_is_not_found() {
        let app = TestDb::spawn().await;

        let err = app.recorder.registrations().deactivate(9).await.unwrap_err();
        assert!(matches!(
            err,
            RecorderError::NotFound {
                entity: EntityKind::RegistrationHistory,
                id: 9
            }
        ));
    }
}

#[tokio::test]
async fn list_orders_by_vessel_then_date() {
    let app = TestDb::spawn().await;
    let fixture = RegistrationFixture::create(&app, "9226906").await;
    fixture.register(&app, "Queen Victoria", "310459000").await;
    fixture.register(&app, "Arcadia", "000954013").await;

    let names: Vec<String> = app
        .recorder
        .registrations()
        .list(Condition::all(), 1, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.registration.name)
        .collect();
    assert_eq!(names, ["Queen Victoria", "Arcadia"]);
}
