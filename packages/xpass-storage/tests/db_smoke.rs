use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use xpass_config::Postgres;
use xpass_domain::{
	geo::{BoundingBox, Coordinates},
	page::Window,
	text::TextFilter,
};
use xpass_storage::{GraphStore, ProfileQuery, db::Db, memory::MemoryGraphStore};
use xpass_testkit::{GraphFixture, ProfileSpec};

/// Bootstraps the schema and loads the same rows `store` holds.
async fn mirror(postgres: &Postgres, store: &MemoryGraphStore) -> xpass_testkit::Result<Db> {
	let db = Db::connect(postgres).await?;

	db.ensure_schema().await?;
	xpass_testkit::copy_to_postgres(store, &db.pool).await?;

	Ok(db)
}

async fn profile_ids<S>(store: &S, query: &ProfileQuery) -> Vec<Uuid>
where
	S: GraphStore,
{
	store
		.find_profiles(query)
		.await
		.expect("Query failed.")
		.into_iter()
		.map(|key| key.profile_id)
		.collect()
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set XPASS_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = xpass_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set XPASS_PG_DSN to run this test.");

		return;
	};

	xpass_testkit::with_test_db(&base_dsn, |postgres| async move {
		let db = Db::connect(&postgres).await?;

		db.ensure_schema().await?;
		// Bootstrapping twice must be a no-op.
		db.ensure_schema().await?;

		for table in [
			"categories",
			"addresses",
			"cards",
			"card_categories",
			"profiles",
			"follow_edges",
			"card_accesses",
		] {
			let count: i64 = sqlx::query_scalar(
				"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
			)
			.bind(table)
			.fetch_one(&db.pool)
			.await?;

			assert_eq!(count, 1, "Missing table {table}.");
		}

		db.pool.close().await;

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set XPASS_PG_DSN to run."]
async fn text_filter_escapes_pattern_characters() {
	let Some(base_dsn) = xpass_testkit::env_dsn() else {
		eprintln!("Skipping text_filter_escapes_pattern_characters; set XPASS_PG_DSN to run.");

		return;
	};
	let mut fixture = GraphFixture::new();
	let real = fixture.profile(ProfileSpec::named("100% real")).expect("Seed.");
	let _fans = fixture.profile(ProfileSpec::named("1000 fans")).expect("Seed.");
	let _under = fixture.profile(ProfileSpec::named("a_b")).expect("Seed.");
	let store = fixture.into_store();

	xpass_testkit::with_test_db(&base_dsn, |postgres| async move {
		let db = mirror(&postgres, &store).await?;

		for (term, expected) in [("0%", vec![real.profile_id]), ("a\\b", Vec::new())] {
			let query = ProfileQuery::new().with_text_filter(TextFilter::new([term]));

			assert_eq!(profile_ids(&db, &query).await, expected, "term {term:?}");
			assert_eq!(profile_ids(store.as_ref(), &query).await, expected, "term {term:?}");
		}

		let trailing = ProfileQuery::new().with_text_filter(TextFilter::new(["real "]));

		assert!(profile_ids(&db, &trailing).await.is_empty());

		db.pool.close().await;

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set XPASS_PG_DSN to run."]
async fn candidate_queries_agree_with_memory_store() {
	let Some(base_dsn) = xpass_testkit::env_dsn() else {
		eprintln!("Skipping candidate_queries_agree_with_memory_store; set XPASS_PG_DSN to run.");

		return;
	};
	let mut fixture = GraphFixture::new();
	let music = fixture.category("Jazz Music").expect("Seed.");
	let chess = fixture.category("Chess").expect("Seed.");
	let by_category = fixture
		.profile(ProfileSpec::named("Ana").categories([music]).at(0.0, 0.0))
		.expect("Seed.");
	let by_city = fixture
		.profile(
			ProfileSpec::named("Bruno")
				.categories([chess])
				.located("Recife", "Pernambuco", "Brazil", 0.01, 0.01),
		)
		.expect("Seed.");
	let by_nickname = fixture
		.profile(
			ProfileSpec::named("Carla").nickname("jazzcat").categories([chess, music]).at(0.02, 0.02),
		)
		.expect("Seed.");
	let near = fixture.profile(ProfileSpec::named("Davi").at(0.03, 0.03)).expect("Seed.");
	let far = fixture
		.profile(ProfileSpec::named("Eva").categories([music]).at(10.0, 10.0))
		.expect("Seed.");
	let nowhere = fixture.profile(ProfileSpec::named("Fabio")).expect("Seed.");
	let store = fixture.into_store();

	xpass_testkit::with_test_db(&base_dsn, |postgres| async move {
		let db = mirror(&postgres, &store).await?;
		let bbox = BoundingBox::around(Coordinates::new(0.0, 0.0), 50.0);
		let cases = [
			(ProfileQuery::new(), vec![
				by_category.profile_id,
				by_city.profile_id,
				by_nickname.profile_id,
				near.profile_id,
				far.profile_id,
				nowhere.profile_id,
			]),
			(ProfileQuery::new().with_text_filter(TextFilter::new(["JAZZ", "recife"])), vec![
				by_category.profile_id,
				by_city.profile_id,
				by_nickname.profile_id,
				far.profile_id,
			]),
			(
				ProfileQuery::new().with_category_filter([music]).excluding([by_category.profile_id]),
				vec![by_nickname.profile_id, far.profile_id],
			),
			(ProfileQuery::new().within(bbox).paginate(Window::new(1, 2)), vec![
				by_nickname.profile_id,
				near.profile_id,
			]),
			(
				ProfileQuery::new()
					.with_cards([by_city.card_id, near.card_id, far.card_id])
					.with_profiles([near.profile_id, far.profile_id, nowhere.profile_id]),
				vec![near.profile_id, far.profile_id],
			),
			(
				ProfileQuery::new()
					.with_name_filter(TextFilter::new(["a"]))
					.with_text_filter(TextFilter::new(["jazz"])),
				vec![by_category.profile_id, by_nickname.profile_id, far.profile_id],
			),
		];

		for (idx, (query, expected)) in cases.iter().enumerate() {
			assert_eq!(&profile_ids(&db, query).await, expected, "case {idx}");
			assert_eq!(&profile_ids(store.as_ref(), query).await, expected, "case {idx}");
		}

		db.pool.close().await;

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set XPASS_PG_DSN to run."]
async fn hydration_and_social_reads_agree_with_memory_store() {
	let Some(base_dsn) = xpass_testkit::env_dsn() else {
		eprintln!(
			"Skipping hydration_and_social_reads_agree_with_memory_store; set XPASS_PG_DSN to run."
		);

		return;
	};
	let mut fixture = GraphFixture::new();
	let sports = fixture.category("Sports").expect("Seed.");
	let surf = fixture.subcategory("Surf", sports).expect("Seed.");
	let music = fixture.category("Music").expect("Seed.");
	let ana = fixture
		.profile(
			ProfileSpec::named("Ana").nickname("ana.surf").categories([surf, music]).at(1.0, 2.0),
		)
		.expect("Seed.");
	let bruno = fixture.profile(ProfileSpec::named("Bruno").categories([music])).expect("Seed.");
	let carla = fixture.profile(ProfileSpec::named("Carla")).expect("Seed.");

	fixture.follow(ana, carla).expect("Follow.");
	fixture.follow(ana, bruno).expect("Follow.");
	fixture.follow(carla, bruno).expect("Follow.");

	let store = fixture.into_store();

	xpass_testkit::with_test_db(&base_dsn, |postgres| async move {
		let db = mirror(&postgres, &store).await?;
		let records = db.hydrate_profiles(&[ana.profile_id, Uuid::new_v4()]).await?;

		assert_eq!(records.len(), 1);

		let record = &records[0];
		let categories: Vec<(&str, Option<&str>)> = record
			.categories
			.iter()
			.map(|node| {
				(node.category.name.as_str(), node.parent.as_ref().map(|parent| parent.name.as_str()))
			})
			.collect();
		let followees: Vec<Uuid> = record.following.iter().map(|edge| edge.followee_id).collect();

		assert_eq!(categories, vec![("Surf", Some("Sports")), ("Music", None)]);
		assert_eq!(record.address.as_ref().map(|address| address.latitude), Some(1.0));
		assert_eq!(record.card.icons.0.len(), 1);
		assert_eq!(record.card.background.0.contrast_color, "#ffffff");
		assert_eq!(followees, vec![carla.profile_id, bruno.profile_id]);

		let memory_following: Vec<Uuid> = store
			.following(ana.profile_id)
			.await?
			.into_iter()
			.map(|edge| edge.followee_id)
			.collect();

		assert_eq!(followees, memory_following);
		assert_eq!(db.followers(bruno.profile_id).await?, vec![ana.profile_id, carla.profile_id]);
		assert_eq!(
			db.followers(bruno.profile_id).await?,
			store.followers(bruno.profile_id).await?
		);

		let mut pg_categories = db.card_category_ids(&[ana.profile_id, bruno.profile_id]).await?;
		let mut memory_categories =
			store.card_category_ids(&[ana.profile_id, bruno.profile_id]).await?;

		pg_categories.sort();
		memory_categories.sort();

		assert_eq!(pg_categories, memory_categories);
		assert_eq!(pg_categories.len(), 2);

		let by_nickname = db.profile_by_nickname("ana.surf").await?;

		assert_eq!(by_nickname.map(|profile| profile.profile_id), Some(ana.profile_id));
		assert!(db.profile_by_nickname("ANA.SURF").await?.is_none());

		let names = |categories: Vec<xpass_storage::models::Category>| {
			categories.into_iter().map(|category| category.name).collect::<Vec<_>>()
		};

		assert_eq!(names(db.categories().await?), vec!["Music", "Sports", "Surf"]);
		assert_eq!(names(db.categories().await?), names(store.categories().await?));

		db.pool.close().await;

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set XPASS_PG_DSN to run."]
async fn access_aggregations_agree_with_memory_store() {
	let Some(base_dsn) = xpass_testkit::env_dsn() else {
		eprintln!("Skipping access_aggregations_agree_with_memory_store; set XPASS_PG_DSN to run.");

		return;
	};
	let now = OffsetDateTime::now_utc();
	let mut fixture = GraphFixture::new();
	let viewer = fixture.profile(ProfileSpec::named("Maria Viewer").views(1_000)).expect("Seed.");
	let ana = fixture.profile(ProfileSpec::named("Mariana").views(3)).expect("Seed.");
	let bruno = fixture.profile(ProfileSpec::named("Marina").views(40)).expect("Seed.");
	let carla = fixture.profile(ProfileSpec::named("Paulo").views(90)).expect("Seed.");
	let _category = fixture.category("Maritime").expect("Seed.");

	fixture.view(ana, "10.0.0.1", None, 2, now - Duration::days(1)).expect("View.");
	fixture.view(ana, "10.0.0.2", Some(viewer), 3, now - Duration::hours(1)).expect("View.");
	fixture.view(bruno, "10.0.0.1", Some(viewer), 9, now - Duration::days(30)).expect("View.");
	fixture.view(carla, "10.0.0.3", None, 4, now - Duration::hours(3)).expect("View.");
	fixture.view(carla, "10.0.0.3", Some(viewer), 1, now - Duration::hours(5)).expect("View.");
	fixture.view(viewer, "10.0.0.1", Some(viewer), 4, now).expect("View.");

	let store = fixture.into_store();

	xpass_testkit::with_test_db(&base_dsn, |postgres| async move {
		let db = mirror(&postgres, &store).await?;
		let since = now - Duration::days(7);
		let totals = |scores: Vec<xpass_storage::models::CardScore>| {
			scores.into_iter().map(|score| (score.card_id, score.total)).collect::<Vec<_>>()
		};
		let mut tied = vec![(ana.card_id, 5), (carla.card_id, 5)];

		tied.sort();

		let expected_top = [tied, vec![(viewer.card_id, 4)]].concat();

		assert_eq!(totals(db.top_cards_since(since).await?), expected_top);
		assert_eq!(totals(store.top_cards_since(since).await?), expected_top);

		let visited = |visits: Vec<xpass_storage::models::CardVisit>| {
			visits.into_iter().map(|visit| visit.card_id).collect::<Vec<_>>()
		};
		let expected_recent = vec![ana.card_id, carla.card_id, bruno.card_id];

		assert_eq!(
			visited(db.recent_cards(viewer.profile_id, Some(viewer.card_id)).await?),
			expected_recent
		);
		assert_eq!(
			visited(store.recent_cards(viewer.profile_id, Some(viewer.card_id)).await?),
			expected_recent
		);
		assert_eq!(
			visited(db.recent_cards(viewer.profile_id, None).await?),
			visited(store.recent_cards(viewer.profile_id, None).await?)
		);
		assert_eq!(visited(db.recent_cards(viewer.profile_id, None).await?)[0], viewer.card_id);

		let names = db.profile_names_matching("mari", Some(viewer.profile_id), 3).await?;

		assert_eq!(names, vec!["Marina".to_string(), "Mariana".to_string()]);
		assert_eq!(names, store.profile_names_matching("mari", Some(viewer.profile_id), 3).await?);
		assert_eq!(
			db.profile_names_matching("MARI", None, 1).await?,
			vec!["Maria Viewer".to_string()]
		);
		assert_eq!(db.category_names_matching("mari", 3).await?, vec!["Maritime".to_string()]);

		db.pool.close().await;

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}
