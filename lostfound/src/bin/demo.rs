//! Scripted lost & found session against the in-process adapters.
//!
//! Registers an account, reports one lost and one found item, lists both
//! boards, claims the found item, refreshes everything, then signs out,
//! printing each slot as it settles. Settings come from `LOSTFOUND_*`
//! environment variables.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use lostfound::ClientSettings;
use lostfound::domain::ports::ProfileSnapshotStore;
use lostfound::domain::{
    Item, ItemKind, ItemStatus, Profile, RemoteGateway, Resource, Secret, SessionStore,
};
use lostfound::outbound::memory::{
    InMemoryAccountService, InMemoryDocumentStore, InMemoryLiveViewStore,
    InMemoryProfileSnapshotStore,
};
use lostfound::outbound::snapshot::FileProfileSnapshotStore;
use lostfound::telemetry::init_tracing;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

/// `lostfound-demo` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lostfound-demo",
    about = "Run a scripted lost & found session against in-memory services",
    version
)]
struct CliArgs {
    /// Display name of the demo account.
    #[arg(long, default_value = "Ada Lovelace")]
    name: String,
    /// Email used as the account identity.
    #[arg(long, default_value = "ada@campus.edu")]
    email: String,
    /// Account secret.
    #[arg(long, default_value = "correct horse")]
    secret: String,
}

fn describe<T>(resource: &Resource<T>, success: impl FnOnce(&T) -> String) -> String {
    match resource {
        Resource::Idle => "idle".to_owned(),
        Resource::Loading => "loading".to_owned(),
        Resource::Success(value) => format!("ok ({})", success(value)),
        Resource::Error(err) => format!("error [{:?}] {err}", err.code()),
    }
}

fn done<T>(resource: &Resource<T>) -> String {
    describe(resource, |_| "done".to_owned())
}

fn items(resource: &Resource<Vec<Item>>) -> String {
    describe(resource, |list| format!("{} items", list.len()))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("lostfound-demo")])
        .map_err(|err| eyre!("load client settings: {err}"))?;
    init_tracing(settings.log_json);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create Tokio runtime")?;
    runtime.block_on(run(args, settings))
}

async fn run(args: CliArgs, settings: ClientSettings) -> Result<()> {
    let documents = Arc::new(InMemoryDocumentStore::default());
    let gateway = RemoteGateway::new(
        Arc::new(InMemoryAccountService::default()),
        Arc::clone(&documents),
        Arc::new(InMemoryLiveViewStore::default()),
    );
    let snapshots: Arc<dyn ProfileSnapshotStore> = match &settings.snapshot_dir {
        Some(dir) => Arc::new(FileProfileSnapshotStore::open(dir).context("open snapshot dir")?),
        None => Arc::new(InMemoryProfileSnapshotStore::default()),
    };
    let clock = Arc::new(DefaultClock);
    let store = SessionStore::new(
        Arc::new(gateway),
        snapshots,
        settings.cache_policy(),
        clock.clone(),
    );

    let session = store.check_session().await;
    println!("session check   {}", describe(&session, |active| active.to_string()));

    let profile = Profile {
        name: args.name,
        email: args.email.clone(),
        ..Profile::default()
    };
    let secret = Secret::new(&args.secret).context("demo secret")?;
    println!("register        {}", done(&store.register(&profile, &secret).await));
    println!(
        "profile         {}",
        describe(&store.fetch_profile(false).await, |p| p.name.clone())
    );

    let now = clock.utc().timestamp_millis();
    let umbrella = Item::new(
        ItemKind::Lost,
        &args.email,
        "Black umbrella",
        "Left under a desk",
        "Library, level 2",
        now,
    );
    let keys = Item::new(
        ItemKind::Found,
        &args.email,
        "Bike keys",
        "Two keys on a red ring",
        "Sports hall",
        now,
    );
    println!("report lost     {}", done(&store.report_item(&umbrella).await));
    println!("report found    {}", done(&store.report_item(&keys).await));
    store.reset_report_state(ItemKind::Lost);
    store.reset_report_state(ItemKind::Found);

    println!("lost board      {}", items(&store.fetch_lost_items(false).await));
    println!("found board     {}", items(&store.fetch_found_items(false).await));
    let reads = documents.reads();
    store.fetch_lost_items(false).await;
    println!("cached re-list  {} extra reads", documents.reads() - reads);

    let opened = store.get_item(&keys.id, "found").await;
    println!("open item       {}", describe(&opened, |i| i.title.clone()));
    let claimed = keys.clone().with_status(ItemStatus::Claimed);
    println!(
        "claim item      {}",
        done(&store.update_item(&keys.id, ItemKind::Found, &claimed).await)
    );

    store.refresh_all().await;
    println!("refresh lost    {}", items(&*store.lost_list_state().borrow()));
    println!("refresh found   {}", items(&*store.found_list_state().borrow()));

    println!("sign out        {}", done(&store.sign_out().await));
    println!("profile after   {}", done(&*store.profile_state().borrow()));
    println!(
        "snapshot        {}",
        if store.cached_profile()?.is_some() { "kept" } else { "cleared" }
    );
    store.reset_sign_out_state();
    Ok(())
}
