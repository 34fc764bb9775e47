//! ConsentLedger CLI: `cledger` command.
//!
//! Provides a command-line interface over a ledger file: granting roles,
//! certifying resources, and driving data and resource sharing agreements
//! through their lifecycle.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use consent_ledger::proof::{FieldElement, Groth16Proof, ProofGate, ProofVerifier};
use consent_ledger::storage::{load_ledger, save_ledger, LEDGER_FILE_NAME};
use consent_ledger::time::micros_to_rfc3339;
use consent_ledger::{
    AgreementId, AgreementKind, ContactRef, IdentityId, Ledger, LedgerEvent, ParticipantRole,
    Party, ResourceAgreementRequest, ResourceId, Role,
};

// ── Directory helpers ─────────────────────────────────────────────────────────

const HOME_ENV: &str = "CONSENT_LEDGER_HOME";

/// Resolve the ledger home: `--home`, then `$CONSENT_LEDGER_HOME`, then
/// `$HOME/.consent-ledger`.
fn ledger_home(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = flag {
        return Ok(home);
    }
    if let Ok(home) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let home = std::env::var("HOME")
        .map_err(|_| anyhow!("cannot locate ledger: pass --home or set {HOME_ENV}"))?;
    Ok(PathBuf::from(home).join(".consent-ledger"))
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// ConsentLedger CLI: manage trust roles, resource certificates and
/// patient consent agreements.
#[derive(Parser, Debug)]
#[command(
    name = "cledger",
    about = "ConsentLedger CLI",
    version,
    long_about = "cledger: ConsentLedger CLI\n\nGrant trust roles, certify resources, and manage data and resource\nsharing agreements between patients and healthcare professionals."
)]
struct Cli {
    /// Ledger directory (default: $CONSENT_LEDGER_HOME or ~/.consent-ledger)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Identity to act as
    #[arg(long = "as", global = true, value_name = "IDENTITY")]
    caller: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new ledger owned by a health authority
    Init {
        /// Identity of the registry owner
        #[arg(long)]
        owner: String,

        /// Replace an existing ledger
        #[arg(long)]
        force: bool,
    },

    /// Manage trust roles
    Role {
        #[command(subcommand)]
        subcommand: RoleCommands,
    },

    /// Manage resource certificates
    Cert {
        #[command(subcommand)]
        subcommand: CertCommands,
    },

    /// Manage data sharing agreements
    Dsa {
        #[command(subcommand)]
        subcommand: DsaCommands,
    },

    /// Manage resource sharing agreements
    Rsa {
        #[command(subcommand)]
        subcommand: RsaCommands,
    },

    /// Manage observers on resource sharing agreements
    Observer {
        #[command(subcommand)]
        subcommand: ObserverCommands,
    },

    /// Authorise and log access to a shared resource
    Access {
        /// Resource sharing agreement ID (rsa_...)
        agreement_id: String,

        /// Resource being accessed
        resource_id: String,

        #[command(flatten)]
        accessor: PartyArgs,
    },

    /// Show the access log
    AccessLog {
        /// Only show accesses under this agreement
        #[arg(long)]
        agreement: Option<String>,
    },

    /// Show or verify the event journal
    Journal {
        #[command(subcommand)]
        subcommand: Option<JournalCommands>,

        /// Maximum number of entries to show (newest last)
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
enum RoleCommands {
    /// Grant a role
    Add {
        /// Role (health_authority, trusted_issuer, healthcare_organization,
        /// healthcare_professional, trusted_application, patient)
        role: String,
        /// Identity receiving the role
        identity: String,
    },
    /// Remove a role
    Remove {
        /// Role to remove
        role: String,
        /// Identity holding the role
        identity: String,
    },
    /// Check whether an identity holds a role
    Check {
        /// Role to check
        role: String,
        /// Identity to check
        identity: String,
    },
    /// List the members of a role
    List {
        /// Role to list
        role: String,
    },
}

#[derive(Subcommand, Debug)]
enum CertCommands {
    /// Certify a resource (trusted issuers only)
    Issue {
        /// Resource identifier
        resource_id: String,
        /// Identity the resource belongs to
        #[arg(long)]
        subject: String,
    },
    /// Revoke a certificate (its issuer only)
    Revoke {
        /// Resource identifier
        resource_id: String,
    },
    /// Show the certificate for a resource
    Show {
        /// Resource identifier
        resource_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum DsaCommands {
    /// Create a data sharing agreement (patients only)
    Create {
        /// Recipient identity (a healthcare professional)
        #[arg(long)]
        recipient: String,
        /// Duration: "1 day", "1 week", "1 month", "3 months", "6 months", "1 year"
        #[arg(long)]
        duration: String,
        /// What is being shared
        #[arg(long)]
        description: String,
    },
    /// Create a data sharing agreement as a proven commitment
    CreateWithProof {
        /// Recipient identity (a healthcare professional)
        #[arg(long)]
        recipient: String,
        /// Agreement duration
        #[arg(long)]
        duration: String,
        /// What is being shared
        #[arg(long)]
        description: String,
        #[command(flatten)]
        proof: ProofArgs,
    },
    /// Accept a pending agreement (recipient)
    Accept { agreement_id: String },
    /// Accept a pending agreement as a proven commitment
    AcceptWithProof {
        agreement_id: String,
        #[command(flatten)]
        proof: ProofArgs,
    },
    /// Cancel a pending agreement (provider)
    Cancel { agreement_id: String },
    /// Reject a pending agreement (recipient)
    Reject { agreement_id: String },
    /// Revoke an active agreement (either party)
    Revoke { agreement_id: String },
    /// Show an agreement
    Show { agreement_id: String },
    /// List agreements for a participant
    List {
        #[command(flatten)]
        query: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
enum RsaCommands {
    /// Create a resource sharing agreement (patients only)
    Create {
        #[command(flatten)]
        recipient: PartyArgs,
        /// Agreement duration
        #[arg(long)]
        duration: String,
        /// Certified resource to share (repeatable)
        #[arg(long = "resource")]
        resources: Vec<String>,
        /// Let the recipient assign observers
        #[arg(long)]
        observers: bool,
    },
    /// Accept a pending agreement (recipient)
    Accept { agreement_id: String },
    /// Cancel a pending agreement (provider)
    Cancel { agreement_id: String },
    /// Reject a pending agreement (recipient)
    Reject { agreement_id: String },
    /// Revoke an active agreement (either party)
    Revoke { agreement_id: String },
    /// Show an agreement
    Show { agreement_id: String },
    /// List agreements for a participant
    List {
        #[command(flatten)]
        query: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
enum ObserverCommands {
    /// Assign an observer (recipient only)
    Add {
        agreement_id: String,
        #[command(flatten)]
        observer: PartyArgs,
    },
    /// Accept your pending observer assignment
    Accept { agreement_id: String },
    /// Remove an observer (recipient only)
    Remove {
        agreement_id: String,
        #[command(flatten)]
        observer: PartyArgs,
    },
}

#[derive(Subcommand, Debug)]
enum JournalCommands {
    /// Verify the journal's hash chain
    Verify,
}

/// An on-registry identity or an external contact.
#[derive(clap::Args, Debug)]
struct PartyArgs {
    /// On-registry identity
    #[arg(long)]
    identity: Option<String>,
    /// External contact reference (e.g. an email address)
    #[arg(long)]
    contact: Option<String>,
}

impl PartyArgs {
    fn party(&self) -> Option<Party> {
        Party::resolve(
            self.identity.as_deref().map(IdentityId::from),
            self.contact.as_deref().map(ContactRef::from),
        )
    }
}

/// Files produced by snarkjs.
#[derive(clap::Args, Debug)]
struct ProofArgs {
    /// Verification key (verification_key.json)
    #[arg(long)]
    vkey: PathBuf,
    /// Proof (proof.json)
    #[arg(long)]
    proof: PathBuf,
    /// Public inputs (public.json)
    #[arg(long)]
    public: PathBuf,
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Bucket to read: provider, recipient or observer
    #[arg(long, default_value = "provider")]
    role: String,
    /// Participant (default: --as)
    #[arg(long)]
    participant: Option<String>,
    /// State filter: ALL, PENDING or ACTIVE
    #[arg(long, default_value = "ALL")]
    filter: String,
    #[arg(long, default_value = "0")]
    offset: usize,
    #[arg(long, default_value = "10")]
    limit: usize,
}

/// Settings shared by every command.
struct Session {
    home: PathBuf,
    caller: Option<IdentityId>,
    verbose: bool,
}

impl Session {
    fn ledger_path(&self) -> PathBuf {
        self.home.join(LEDGER_FILE_NAME)
    }

    fn caller(&self) -> Result<&IdentityId> {
        self.caller
            .as_ref()
            .ok_or_else(|| anyhow!("this command needs an identity: pass --as IDENTITY"))
    }

    fn load(&self) -> Result<Ledger> {
        let path = self.ledger_path();
        log::debug!("loading ledger from {}", path.display());
        load_ledger(&path).with_context(|| {
            format!(
                "failed to load ledger from {} (run `cledger init` first)",
                path.display()
            )
        })
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        log::debug!("saving ledger ({} journal entries)", ledger.journal().len());
        save_ledger(ledger, &self.ledger_path()).context("failed to save ledger")
    }

    /// Load, apply one operation as the caller, save and report the event.
    fn apply<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut Ledger, &IdentityId) -> consent_ledger::Result<LedgerEvent>,
    {
        let caller = self.caller()?;
        let mut ledger = self.load()?;
        let event = op(&mut ledger, caller)?;
        self.save(&ledger)?;
        self.report(&event)
    }

    fn report(&self, event: &LedgerEvent) -> Result<()> {
        println!("{}", describe(event));
        if self.verbose {
            println!("{}", serde_json::to_string_pretty(event)?);
        }
        Ok(())
    }
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = ledger_home(cli.home).and_then(|home| {
        let session = Session {
            home,
            caller: cli.caller.map(IdentityId::new),
            verbose: cli.verbose,
        };
        run(&session, cli.command)
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::Init { owner, force } => cmd_init(session, &owner, force),
        Commands::Role { subcommand } => match subcommand {
            RoleCommands::Add { role, identity } => {
                let role: Role = role.parse()?;
                let identity = IdentityId::new(identity);
                session.apply(|l, caller| l.add_role(caller, role, &identity))
            }
            RoleCommands::Remove { role, identity } => {
                let role: Role = role.parse()?;
                let identity = IdentityId::new(identity);
                session.apply(|l, caller| l.remove_role(caller, role, &identity))
            }
            RoleCommands::Check { role, identity } => cmd_role_check(session, &role, &identity),
            RoleCommands::List { role } => cmd_role_list(session, &role),
        },
        Commands::Cert { subcommand } => match subcommand {
            CertCommands::Issue {
                resource_id,
                subject,
            } => session.apply(|l, caller| {
                l.certify(caller, ResourceId::new(resource_id), IdentityId::new(subject))
            }),
            CertCommands::Revoke { resource_id } => session
                .apply(|l, caller| l.revoke_certificate(caller, &ResourceId::new(resource_id))),
            CertCommands::Show { resource_id } => cmd_cert_show(session, &resource_id),
        },
        Commands::Dsa { subcommand } => match subcommand {
            DsaCommands::Create {
                recipient,
                duration,
                description,
            } => session.apply(|l, caller| {
                l.create_dsa(caller, &IdentityId::new(recipient), &duration, &description)
            }),
            DsaCommands::CreateWithProof {
                recipient,
                duration,
                description,
                proof,
            } => cmd_dsa_create_with_proof(
                session,
                &IdentityId::new(recipient),
                &duration,
                &description,
                &proof,
            ),
            DsaCommands::Accept { agreement_id } => {
                session.apply(|l, caller| l.accept_dsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            DsaCommands::AcceptWithProof {
                agreement_id,
                proof,
            } => cmd_dsa_accept_with_proof(session, &AgreementId::from(agreement_id.as_str()), &proof),
            DsaCommands::Cancel { agreement_id } => {
                session.apply(|l, caller| l.cancel_dsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            DsaCommands::Reject { agreement_id } => {
                session.apply(|l, caller| l.reject_dsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            DsaCommands::Revoke { agreement_id } => {
                session.apply(|l, caller| l.revoke_dsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            DsaCommands::Show { agreement_id } => cmd_dsa_show(session, &agreement_id),
            DsaCommands::List { query } => cmd_list(session, AgreementKind::DataSharing, &query),
        },
        Commands::Rsa { subcommand } => match subcommand {
            RsaCommands::Create {
                recipient,
                duration,
                resources,
                observers,
            } => cmd_rsa_create(session, &recipient, &duration, resources, observers),
            RsaCommands::Accept { agreement_id } => {
                session.apply(|l, caller| l.accept_rsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            RsaCommands::Cancel { agreement_id } => {
                session.apply(|l, caller| l.cancel_rsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            RsaCommands::Reject { agreement_id } => {
                session.apply(|l, caller| l.reject_rsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            RsaCommands::Revoke { agreement_id } => {
                session.apply(|l, caller| l.revoke_rsa(caller, &AgreementId::from(agreement_id.as_str())))
            }
            RsaCommands::Show { agreement_id } => cmd_rsa_show(session, &agreement_id),
            RsaCommands::List { query } => cmd_list(session, AgreementKind::ResourceSharing, &query),
        },
        Commands::Observer { subcommand } => match subcommand {
            ObserverCommands::Add {
                agreement_id,
                observer,
            } => {
                let observer = required_party(&observer, "observer")?;
                session.apply(|l, caller| {
                    l.create_observer_assignment(
                        caller,
                        &AgreementId::from(agreement_id.as_str()),
                        observer,
                    )
                })
            }
            ObserverCommands::Accept { agreement_id } => session.apply(|l, caller| {
                l.accept_observer_assignment(caller, &AgreementId::from(agreement_id.as_str()))
            }),
            ObserverCommands::Remove {
                agreement_id,
                observer,
            } => {
                let observer = required_party(&observer, "observer")?;
                session.apply(|l, caller| {
                    l.remove_observer_assignment(
                        caller,
                        &AgreementId::from(agreement_id.as_str()),
                        &observer,
                    )
                })
            }
        },
        Commands::Access {
            agreement_id,
            resource_id,
            accessor,
        } => {
            let accessor = required_party(&accessor, "accessor")?;
            session.apply(|l, caller| {
                l.authorize_and_log_access(
                    caller,
                    &AgreementId::from(agreement_id.as_str()),
                    ResourceId::new(resource_id),
                    accessor,
                )
            })
        }
        Commands::AccessLog { agreement } => cmd_access_log(session, agreement.as_deref()),
        Commands::Journal { subcommand, limit } => match subcommand {
            Some(JournalCommands::Verify) => cmd_journal_verify(session),
            None => cmd_journal(session, limit),
        },
    }
}

fn required_party(args: &PartyArgs, what: &str) -> Result<Party> {
    args.party()
        .ok_or_else(|| anyhow!("the {what} needs --identity or --contact"))
}

// ── Command implementations ───────────────────────────────────────────────────

/// `cledger init --owner ID [--force]`
fn cmd_init(session: &Session, owner: &str, force: bool) -> Result<()> {
    let path = session.ledger_path();
    if path.exists() && !force {
        return Err(anyhow!(
            "ledger already exists at {} (use --force to replace it)",
            path.display()
        ));
    }

    let ledger = Ledger::new(IdentityId::new(owner));
    session.save(&ledger)?;

    println!("Created ledger");
    println!("  Owner: {owner}");
    println!("  File:  {}", path.display());
    Ok(())
}

/// `cledger role check ROLE IDENTITY`
fn cmd_role_check(session: &Session, role: &str, identity: &str) -> Result<()> {
    let role: Role = role.parse()?;
    let ledger = session.load()?;
    let identity = IdentityId::new(identity);

    match ledger.registry().membership(role, &identity) {
        Some(m) => {
            println!("{identity} holds {role}");
            println!("  Added by: {}", m.added_by);
            println!("  Added at: {}", micros_to_rfc3339(m.added_at));
        }
        None => println!("{identity} does not hold {role}"),
    }
    Ok(())
}

/// `cledger role list ROLE`
fn cmd_role_list(session: &Session, role: &str) -> Result<()> {
    let role: Role = role.parse()?;
    let ledger = session.load()?;
    let members = ledger.registry().members(role);

    if members.is_empty() {
        println!("No members hold {role}.");
        return Ok(());
    }
    println!("{role} ({}):", members.len());
    for m in members {
        if session.verbose {
            println!("  {}  added by {} at {}", m.identity, m.added_by, micros_to_rfc3339(m.added_at));
        } else {
            println!("  {}", m.identity);
        }
    }
    Ok(())
}

/// `cledger cert show RESOURCE`
fn cmd_cert_show(session: &Session, resource_id: &str) -> Result<()> {
    let ledger = session.load()?;
    let cert = ledger.verify_certificate(&ResourceId::new(resource_id))?;

    println!("Certificate: {}", cert.resource_id);
    println!("  Subject: {}", cert.subject);
    println!("  Issuer:  {}", cert.issuer);
    println!("  Issued:  {}", micros_to_rfc3339(cert.issued_at));
    Ok(())
}

/// `cledger dsa show ID`
fn cmd_dsa_show(session: &Session, agreement_id: &str) -> Result<()> {
    let ledger = session.load()?;
    let dsa = ledger.dsa(&AgreementId::from(agreement_id))?;

    println!("Data sharing agreement: {}", dsa.id);
    println!("  Provider:    {}", dsa.provider);
    println!("  Recipient:   {}", dsa.recipient);
    println!("  State:       {}", dsa.state);
    println!("  Duration:    {}", dsa.duration);
    println!("  Description: {}", dsa.description);
    println!("  Created:     {}", micros_to_rfc3339(dsa.created_at));
    Ok(())
}

/// `cledger rsa show ID`
fn cmd_rsa_show(session: &Session, agreement_id: &str) -> Result<()> {
    let ledger = session.load()?;
    let rsa = ledger.rsa(&AgreementId::from(agreement_id))?;

    println!("Resource sharing agreement: {}", rsa.id);
    println!("  Provider:  {}", rsa.provider);
    println!("  Recipient: {}", rsa.recipient);
    println!("  State:     {}", rsa.state);
    println!("  Duration:  {}", rsa.duration);
    println!("  Created:   {}", micros_to_rfc3339(rsa.created_at));
    println!("  Resources:");
    for r in &rsa.resources {
        println!("    {r}");
    }
    if rsa.observers_enabled {
        println!("  Observers ({}):", rsa.observers.len());
        for o in &rsa.observers {
            let status = if o.accepted { "accepted" } else { "pending" };
            println!("    {}  [{status}]", o.observer);
        }
    } else {
        println!("  Observers: disabled");
    }
    Ok(())
}

/// `cledger rsa create (--identity ID | --contact C) --duration D --resource R...`
fn cmd_rsa_create(
    session: &Session,
    recipient: &PartyArgs,
    duration: &str,
    resources: Vec<String>,
    observers: bool,
) -> Result<()> {
    let mut request = ResourceAgreementRequest::new(duration)
        .observers(observers)
        .resources(resources.into_iter().map(ResourceId::new).collect());
    if let Some(identity) = &recipient.identity {
        request = request.recipient(IdentityId::new(identity.as_str()));
    }
    if let Some(contact) = &recipient.contact {
        request = request.recipient_contact(ContactRef::new(contact.as_str()));
    }
    session.apply(|l, caller| l.create_rsa(caller, request))
}

/// `cledger dsa list` / `cledger rsa list`
fn cmd_list(session: &Session, kind: AgreementKind, query: &ListArgs) -> Result<()> {
    let role: ParticipantRole = query.role.parse()?;
    let participant = match &query.participant {
        Some(p) => IdentityId::new(p.as_str()),
        None => session.caller()?.clone(),
    };
    let ledger = session.load()?;

    let rows: Vec<(String, String, String)> = match kind {
        AgreementKind::DataSharing => {
            let total = ledger.count_dsas(role, &participant, &query.filter)?;
            println!("{total} data sharing agreement(s)");
            ledger
                .list_dsas(role, &participant, &query.filter, query.offset, query.limit)?
                .into_iter()
                .map(|a| (a.id.to_string(), a.state.to_string(), a.recipient.to_string()))
                .collect()
        }
        AgreementKind::ResourceSharing => {
            let total = ledger.count_rsas(role, &participant, &query.filter)?;
            println!("{total} resource sharing agreement(s)");
            ledger
                .list_rsas(role, &participant, &query.filter, query.offset, query.limit)?
                .into_iter()
                .map(|a| (a.id.to_string(), a.state.to_string(), a.recipient.to_string()))
                .collect()
        }
    };

    for (id, state, recipient) in rows {
        println!("  {id:<30} {state:<8} -> {recipient}");
    }
    Ok(())
}

/// `cledger access-log [--agreement ID]`
fn cmd_access_log(session: &Session, agreement: Option<&str>) -> Result<()> {
    let ledger = session.load()?;
    let filter = agreement.map(AgreementId::from);
    let entries: Vec<_> = ledger
        .access_log()
        .iter()
        .filter(|e| filter.as_ref().map_or(true, |id| &e.agreement_id == id))
        .collect();

    if entries.is_empty() {
        println!("No accesses logged.");
        return Ok(());
    }
    for e in entries {
        println!(
            "{}  {}  {} by {} (logged by {})",
            micros_to_rfc3339(e.timestamp),
            e.agreement_id,
            e.resource_id,
            e.accessor,
            e.logged_by
        );
    }
    Ok(())
}

/// `cledger journal [--limit N]`
fn cmd_journal(session: &Session, limit: usize) -> Result<()> {
    let ledger = session.load()?;
    let entries = ledger.journal().entries();
    let start = entries.len().saturating_sub(limit);

    for entry in &entries[start..] {
        println!(
            "#{:<5} {}  {:<22} {}",
            entry.sequence,
            micros_to_rfc3339(entry.recorded_at),
            entry.event.as_tag(),
            describe(&entry.event)
        );
        if session.verbose {
            println!("       hash: {}", entry.entry_hash);
        }
    }
    Ok(())
}

/// `cledger journal verify`
fn cmd_journal_verify(session: &Session) -> Result<()> {
    let ledger = session.load()?;
    let journal = ledger.journal();
    journal.verify().context("journal verification failed")?;

    println!("Journal OK ({} entries)", journal.len());
    if let Some(head) = journal.head_hash() {
        println!("  Head: {head}");
    }
    Ok(())
}

// ── Proof-gated commands ──────────────────────────────────────────────────────

#[cfg(feature = "groth16")]
fn load_verifier(vkey: &Path) -> Result<Box<dyn ProofVerifier>> {
    let verifier = consent_ledger::proof::Groth16Verifier::load(vkey)
        .with_context(|| format!("failed to load verification key {}", vkey.display()))?;
    Ok(Box::new(verifier))
}

#[cfg(not(feature = "groth16"))]
fn load_verifier(_vkey: &Path) -> Result<Box<dyn ProofVerifier>> {
    Err(anyhow!(
        "cledger was built without proof support (enable the groth16 feature)"
    ))
}

fn read_proof(args: &ProofArgs) -> Result<(Groth16Proof, Vec<FieldElement>)> {
    let proof = std::fs::read_to_string(&args.proof)
        .with_context(|| format!("failed to read {}", args.proof.display()))?;
    let public = std::fs::read_to_string(&args.public)
        .with_context(|| format!("failed to read {}", args.public.display()))?;
    let proof: Groth16Proof = serde_json::from_str(&proof).context("invalid proof file")?;
    let public: Vec<FieldElement> =
        serde_json::from_str(&public).context("invalid public inputs file")?;
    Ok((proof, public))
}

/// `cledger dsa create-with-proof --recipient ID --duration D --description T --vkey F --proof F --public F`
fn cmd_dsa_create_with_proof(
    session: &Session,
    recipient: &IdentityId,
    duration: &str,
    description: &str,
    args: &ProofArgs,
) -> Result<()> {
    let gate = ProofGate::new(load_verifier(&args.vkey)?);
    let (proof, public) = read_proof(args)?;

    let mut ledger = session.load()?;
    let event =
        ledger.create_dsa_with_proof(&gate, recipient, duration, description, &proof, &public)?;
    session.save(&ledger)?;
    session.report(&event)
}

/// `cledger dsa accept-with-proof ID --vkey F --proof F --public F`
fn cmd_dsa_accept_with_proof(session: &Session, id: &AgreementId, args: &ProofArgs) -> Result<()> {
    let gate = ProofGate::new(load_verifier(&args.vkey)?);
    let (proof, public) = read_proof(args)?;

    let mut ledger = session.load()?;
    let event = ledger.accept_dsa_with_proof(&gate, id, &proof, &public)?;
    session.save(&ledger)?;
    session.report(&event)
}

// ── Output helpers ────────────────────────────────────────────────────────────

fn kind_label(kind: AgreementKind) -> &'static str {
    match kind {
        AgreementKind::DataSharing => "data sharing agreement",
        AgreementKind::ResourceSharing => "resource sharing agreement",
    }
}

/// One-line human summary of an event.
fn describe(event: &LedgerEvent) -> String {
    match event {
        LedgerEvent::RoleGranted {
            role,
            identity,
            granted_by,
        } => format!("Granted {role} to {identity} (by {granted_by})"),
        LedgerEvent::RoleRevoked {
            role,
            identity,
            revoked_by,
        } => format!("Removed {role} from {identity} (by {revoked_by})"),
        LedgerEvent::CertificateIssued {
            resource_id,
            subject,
            issuer,
        } => format!("Certified {resource_id} for {subject} (issuer {issuer})"),
        LedgerEvent::CertificateRevoked {
            resource_id,
            issuer,
        } => format!("Revoked certificate for {resource_id} (issuer {issuer})"),
        LedgerEvent::AgreementCreated {
            id,
            kind,
            provider,
            recipient,
            state,
        } => format!(
            "Created {} {id}: {provider} -> {recipient} [{state}]",
            kind_label(*kind)
        ),
        LedgerEvent::AgreementAccepted { id, kind } => {
            format!("Accepted {} {id}", kind_label(*kind))
        }
        LedgerEvent::AgreementTerminated {
            id,
            kind,
            disposition,
            by,
        } => format!(
            "{} {} {id} (by {by})",
            capitalize(disposition.as_str()),
            kind_label(*kind)
        ),
        LedgerEvent::ObserverAssigned {
            id,
            observer,
            accepted,
        } => {
            let status = if *accepted { "accepted" } else { "pending" };
            format!("Assigned observer {observer} to {id} [{status}]")
        }
        LedgerEvent::ObserverAccepted { id, observer } => {
            format!("Observer {observer} accepted assignment on {id}")
        }
        LedgerEvent::ObserverRemoved { id, observer } => {
            format!("Removed observer {observer} from {id}")
        }
        LedgerEvent::AccessLogged {
            id,
            resource_id,
            accessor,
            logged_by,
        } => format!("Logged access to {resource_id} under {id} by {accessor} (logged by {logged_by})"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
