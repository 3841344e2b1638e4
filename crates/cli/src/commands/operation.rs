//! Storage operations
//!
//! Every storage command is a unit type implementing [`Operation`]. The
//! registry turns each one into a clap subcommand whose flags come from the
//! operation's field declarations, and [`dispatch`] runs the common pipeline:
//! bind the request, resolve the region, connect, call, render.

use std::sync::Arc;

use async_trait::async_trait;
use clap::parser::ValueSource;
use clap::{Arg, ArgMatches, Command, FromArgMatches, Subcommand};
use futures::future::BoxFuture;
use serde::Serialize;

use cos_core::binding::{Bindable, FieldSpecs, FlagValue, Invocation, bind_request};
use cos_core::{Config, ConnectionSettings, Connector, Error, ObjectStorage, Result, resolve_region};

use super::{bucket, bucket_config, multipart, object};
use crate::output::Formatter;

/// Flag selecting the target region, accepted by every operation
pub const REGION_FLAG: &str = "region";

/// Environment variable read when `--region` is not given
pub const REGION_ENV: &str = "COS_REGION";

/// One storage command
#[async_trait]
pub trait Operation: 'static {
    /// Subcommand name
    const NAME: &'static str;

    /// One-line help
    const ABOUT: &'static str;

    /// Printed instead of field lines when the response is empty
    const EMPTY_MESSAGE: Option<&'static str> = None;

    /// Spinner message while the call runs, for transfers
    const PROGRESS: Option<&'static str> = None;

    type Request: Bindable + Send + 'static;
    type Response: Serialize + Send + 'static;

    /// Mandatory and optional fields and the flags that feed them
    fn fields() -> FieldSpecs;

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response>;
}

/// Shared state for one CLI invocation
pub struct Session {
    pub config: Config,
    pub formatter: Formatter,
    pub connector: Arc<dyn Connector>,
}

type Runner = for<'a> fn(&'a Session, &'a Invocation) -> BoxFuture<'a, Result<()>>;

/// Type-erased registry entry
pub struct Entry {
    pub name: &'static str,
    pub about: &'static str,
    pub fields: fn() -> FieldSpecs,
    run: Runner,
}

impl Entry {
    const fn of<O: Operation>() -> Self {
        Self {
            name: O::NAME,
            about: O::ABOUT,
            fields: O::fields,
            run: run_boxed::<O>,
        }
    }

    /// The clap subcommand for this operation
    ///
    /// Mandatory flags are not marked required here; the binding layer
    /// reports them so every missing field fails the same way.
    pub fn command(&self) -> Command {
        let specs = (self.fields)();
        let mut command = Command::new(self.name).about(self.about);

        for spec in specs.mandatory_fields() {
            command = command.arg(
                Arg::new(spec.flag)
                    .long(spec.flag)
                    .help(spec.help)
                    .help_heading("Required"),
            );
        }
        for spec in specs.optional_fields() {
            command = command.arg(
                Arg::new(spec.flag)
                    .long(spec.flag)
                    .help(spec.help)
                    .help_heading("Optional"),
            );
        }

        command.arg(
            Arg::new(REGION_FLAG)
                .long(REGION_FLAG)
                .env(REGION_ENV)
                .help("Region to target [default: configured region]"),
        )
    }

    fn invocation(&self, matches: &ArgMatches) -> Invocation {
        let specs = (self.fields)();
        specs
            .iter()
            .map(|spec| spec.flag)
            .chain(std::iter::once(REGION_FLAG))
            .filter_map(|flag| {
                let raw = matches.get_one::<String>(flag)?;
                let explicit = matches!(
                    matches.value_source(flag),
                    Some(ValueSource::CommandLine | ValueSource::EnvVariable)
                );
                Some((
                    flag.to_string(),
                    FlagValue {
                        raw: raw.clone(),
                        explicit,
                    },
                ))
            })
            .collect()
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry").field("name", &self.name).finish()
    }
}

/// All storage operations, in help order
pub static OPERATIONS: &[Entry] = &[
    Entry::of::<bucket::ListBuckets>(),
    Entry::of::<bucket::CreateBucket>(),
    Entry::of::<bucket::DeleteBucket>(),
    Entry::of::<bucket::HeadBucket>(),
    Entry::of::<bucket::GetBucketLocation>(),
    Entry::of::<bucket::GetBucketAcl>(),
    Entry::of::<bucket::PutBucketAcl>(),
    Entry::of::<bucket_config::GetBucketCors>(),
    Entry::of::<bucket_config::PutBucketCors>(),
    Entry::of::<bucket_config::DeleteBucketCors>(),
    Entry::of::<bucket_config::GetBucketVersioning>(),
    Entry::of::<bucket_config::PutBucketVersioning>(),
    Entry::of::<object::ListObjects>(),
    Entry::of::<object::PutObject>(),
    Entry::of::<object::GetObject>(),
    Entry::of::<object::HeadObject>(),
    Entry::of::<object::DeleteObject>(),
    Entry::of::<object::CopyObject>(),
    Entry::of::<object::DeleteObjects>(),
    Entry::of::<multipart::CreateMultipartUpload>(),
    Entry::of::<multipart::CompleteMultipartUpload>(),
    Entry::of::<multipart::AbortMultipartUpload>(),
    Entry::of::<multipart::ListMultipartUploads>(),
    Entry::of::<multipart::UploadPart>(),
    Entry::of::<multipart::ListParts>(),
];

pub fn find(name: &str) -> Option<&'static Entry> {
    OPERATIONS.iter().find(|entry| entry.name == name)
}

/// A parsed storage subcommand: its name and the flags given to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationCall {
    pub name: String,
    pub invocation: Invocation,
}

impl FromArgMatches for OperationCall {
    fn from_arg_matches(matches: &ArgMatches) -> std::result::Result<Self, clap::Error> {
        let Some((name, sub)) = matches.subcommand() else {
            return Err(clap::Error::raw(
                clap::error::ErrorKind::MissingSubcommand,
                "a storage operation is required",
            ));
        };
        let entry = find(name).ok_or_else(|| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidSubcommand,
                format!("unknown operation '{name}'"),
            )
        })?;

        Ok(Self {
            name: entry.name.to_string(),
            invocation: entry.invocation(sub),
        })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> std::result::Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

impl Subcommand for OperationCall {
    fn augment_subcommands(command: Command) -> Command {
        OPERATIONS
            .iter()
            .fold(command, |command, entry| command.subcommand(entry.command()))
    }

    fn augment_subcommands_for_update(command: Command) -> Command {
        Self::augment_subcommands(command)
    }

    fn has_subcommand(name: &str) -> bool {
        find(name).is_some()
    }
}

/// Run a parsed storage subcommand
pub async fn dispatch(call: &OperationCall, session: &Session) -> Result<()> {
    let entry = find(&call.name)
        .ok_or_else(|| Error::General(format!("Unknown operation '{}'", call.name)))?;

    tracing::debug!(
        operation = entry.name,
        flags = ?call.invocation.names().collect::<Vec<_>>(),
        "dispatching"
    );
    (entry.run)(session, &call.invocation).await
}

fn run_boxed<'a, O: Operation>(session: &'a Session, invocation: &'a Invocation) -> BoxFuture<'a, Result<()>> {
    Box::pin(run::<O>(session, invocation))
}

async fn run<O: Operation>(session: &Session, invocation: &Invocation) -> Result<()> {
    let request: O::Request = bind_request(&O::fields(), invocation)?;

    let explicit = invocation
        .is_set(REGION_FLAG)
        .then(|| invocation.value(REGION_FLAG))
        .flatten();
    let region = resolve_region(explicit, &session.config)?;
    let settings = ConnectionSettings::from_config(region, &session.config)?;

    let store = session.connector.connect(&settings).await?;
    tracing::debug!(operation = O::NAME, region = %settings.region, "calling storage");

    let spinner = O::PROGRESS.map(|message| session.formatter.spinner(message));
    let result = O::call(&*store, request).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    session.formatter.success(&result?, O::EMPTY_MESSAGE)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Test doubles for the storage seam

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::output::OutputConfig;
    use cos_core::types::*;

    mockall::mock! {
        pub Storage {}

        #[async_trait]
        impl ObjectStorage for Storage {
            async fn list_buckets(&self, request: ListBucketsRequest) -> Result<ListBucketsOutput>;
            async fn create_bucket(&self, request: CreateBucketRequest) -> Result<CreateBucketOutput>;
            async fn delete_bucket(&self, request: BucketRequest) -> Result<BucketOutput>;
            async fn head_bucket(&self, request: BucketRequest) -> Result<HeadBucketOutput>;
            async fn get_bucket_location(&self, request: BucketRequest) -> Result<BucketLocationOutput>;
            async fn get_bucket_acl(&self, request: BucketRequest) -> Result<BucketAclOutput>;
            async fn put_bucket_acl(&self, request: PutBucketAclRequest) -> Result<BucketOutput>;
            async fn get_bucket_cors(&self, request: BucketRequest) -> Result<CorsConfiguration>;
            async fn put_bucket_cors(&self, request: PutBucketCorsRequest) -> Result<BucketOutput>;
            async fn delete_bucket_cors(&self, request: BucketRequest) -> Result<BucketOutput>;
            async fn get_bucket_versioning(&self, request: BucketRequest) -> Result<VersioningConfiguration>;
            async fn put_bucket_versioning(&self, request: PutBucketVersioningRequest) -> Result<BucketOutput>;
            async fn list_objects(&self, request: ListObjectsRequest) -> Result<ListObjectsOutput>;
            async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput>;
            async fn get_object(&self, request: GetObjectRequest) -> Result<GetObjectOutput>;
            async fn head_object(&self, request: ObjectRequest) -> Result<ObjectMetadata>;
            async fn delete_object(&self, request: ObjectRequest) -> Result<DeleteObjectOutput>;
            async fn copy_object(&self, request: CopyObjectRequest) -> Result<CopyObjectOutput>;
            async fn delete_objects(&self, request: DeleteObjectsRequest) -> Result<DeleteObjectsOutput>;
            async fn create_multipart_upload(&self, request: CreateMultipartUploadRequest) -> Result<CreateMultipartUploadOutput>;
            async fn complete_multipart_upload(&self, request: CompleteMultipartUploadRequest) -> Result<CompleteMultipartUploadOutput>;
            async fn abort_multipart_upload(&self, request: UploadRequest) -> Result<AbortMultipartUploadOutput>;
            async fn list_multipart_uploads(&self, request: ListMultipartUploadsRequest) -> Result<ListMultipartUploadsOutput>;
            async fn upload_part(&self, request: UploadPartRequest) -> Result<UploadPartOutput>;
            async fn list_parts(&self, request: ListPartsRequest) -> Result<ListPartsOutput>;
        }
    }

    /// Connector that counts connections and hands out one prepared store
    #[derive(Default)]
    pub struct CountingConnector {
        pub connects: AtomicUsize,
        pub last_settings: Mutex<Option<ConnectionSettings>>,
        storage: Mutex<Option<MockStorage>>,
    }

    impl CountingConnector {
        pub fn with_storage(storage: MockStorage) -> Self {
            Self {
                storage: Mutex::new(Some(storage)),
                ..Default::default()
            }
        }

        pub fn connects(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Connector for CountingConnector {
        async fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn ObjectStorage>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            *self.last_settings.lock().unwrap() = Some(settings.clone());
            match self.storage.lock().unwrap().take() {
                Some(storage) => Ok(Box::new(storage)),
                None => Err(Error::Network("no storage prepared".into())),
            }
        }
    }

    /// Session with a configured default region and quiet output
    pub fn session(connector: Arc<CountingConnector>) -> Session {
        let mut config = Config::default();
        config
            .set(cos_core::config::keys::REGION, "us-south")
            .unwrap();
        session_with(config, connector)
    }

    pub fn session_with(config: Config, connector: Arc<CountingConnector>) -> Session {
        Session {
            config,
            formatter: Formatter::new(OutputConfig {
                quiet: true,
                ..Default::default()
            }),
            connector,
        }
    }

    /// Parse argv into a storage call
    pub fn call(args: &[&str]) -> OperationCall {
        use clap::Parser;

        let cli = crate::commands::Cli::try_parse_from(std::iter::once("cos").chain(args.iter().copied()))
            .unwrap();
        match cli.command {
            crate::commands::Commands::Operation(call) => call,
            other => panic!("expected a storage operation, got {other:?}"),
        }
    }
}
