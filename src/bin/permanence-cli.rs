#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use permanence::{
    io,
    model::{
        AvailabilityId, AvailabilityRule, ClockTime, Dataset, MachineId, SpecialtyId, Worker,
        WorkerId,
    },
    report::{dashboard_title, ScheduleRenderer, TextSchedule},
    require_admin,
    storage::{JsonStorage, Storage},
    Clock, CurrentUser, DashboardPolicy, Directory, FixedClock, ProjectOptions, ScheduleProjector,
    ScheduleTarget, SlotSpec, SystemClock,
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI des permanences du makerspace
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du jeu de données
    #[arg(long, global = true, env = "PERMANENCE_DATASET", default_value = "permanence.json")]
    dataset: String,

    /// Membre au nom duquel les modifications sont faites
    #[arg(long, global = true, env = "PERMANENCE_WORKER")]
    as_worker: Option<WorkerId>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Planning du tableau de bord (lundi suivant le week-end)
    Today {
        /// Remplace la date du jour (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Affiche le week-end tel quel
        #[arg(long)]
        no_substitute: bool,
        /// Retire les créneaux identiques
        #[arg(long)]
        dedupe: bool,
    },

    /// Planning d'une date (YYYY-MM-DD) ou d'un jour de semaine (1-7, Monday, ...)
    Schedule {
        target: String,
        /// Retire les créneaux identiques
        #[arg(long)]
        dedupe: bool,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Horaires d'ouverture par jour
    Hours,

    /// Lister les membres
    Workers,

    /// Disponibilités d'un membre
    Availability {
        #[arg(long)]
        worker: WorkerId,
    },

    /// Importer des membres depuis un CSV (admin, sauf jeu de données vide)
    ImportWorkers {
        #[arg(long)]
        csv: String,
    },

    /// Importer des machines depuis un CSV
    ImportMachines {
        #[arg(long)]
        csv: String,
    },

    /// Importer des disponibilités depuis un CSV
    ImportAvailability {
        #[arg(long)]
        csv: String,
    },

    /// Importer des spécialités depuis un CSV (admin)
    ImportSpecialties {
        #[arg(long)]
        csv: String,
    },

    /// Ajouter une disponibilité
    AddAvailability {
        #[arg(long)]
        worker: WorkerId,
        /// Jour de semaine ou plage YYYY-MM-DD..YYYY-MM-DD
        #[arg(long)]
        day: AvailabilityRule,
        /// HH:MM
        #[arg(long)]
        start: ClockTime,
        /// HH:MM
        #[arg(long)]
        end: ClockTime,
    },

    /// Supprimer une disponibilité
    RemoveAvailability {
        #[arg(long)]
        id: AvailabilityId,
    },

    /// Ajouter une spécialité (admin)
    AddSpecialty {
        #[arg(long)]
        worker: WorkerId,
        #[arg(long)]
        machine: MachineId,
    },

    /// Supprimer une spécialité (admin)
    RemoveSpecialty {
        #[arg(long)]
        id: SpecialtyId,
    },

    /// Remplacer spécialités et disponibilités d'un membre
    ReplaceSchedule {
        #[arg(long)]
        worker: WorkerId,
        /// Machine maîtrisée (répétable)
        #[arg(long = "machine")]
        machines: Vec<MachineId>,
        /// Créneau `DAY@HH:MM-HH:MM` (répétable)
        #[arg(long = "slot")]
        slots: Vec<SlotSpec>,
    },

    /// Ajouter un membre (admin)
    AddWorker {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Responsable de l'atelier
        #[arg(long)]
        boss: bool,
    },

    /// Modifier un membre (admin) ; seuls les champs fournis changent
    EditWorker {
        #[arg(long)]
        worker: WorkerId,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// true / false
        #[arg(long)]
        boss: Option<bool>,
    },

    /// Supprimer un membre et ses données (admin)
    RemoveWorker {
        #[arg(long)]
        worker: WorkerId,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.dataset);
    let data = storage.load_or_default()?;
    let renderer = TextSchedule;

    match cli.cmd {
        Commands::Today {
            date,
            no_substitute,
            dedupe,
        } => {
            let clock: Box<dyn Clock> = match date {
                Some(d) => Box::new(FixedClock(d)),
                None => Box::new(SystemClock),
            };
            let projector = ScheduleProjector::new(&data, clock.as_ref())
                .with_options(ProjectOptions {
                    dedupe_identical: dedupe,
                })
                .with_policy(DashboardPolicy {
                    substitute_weekend: !no_substitute,
                });
            let dashboard = projector.dashboard()?;
            print!(
                "{}",
                renderer.render_schedule(&dashboard_title(&dashboard), &dashboard.entries)
            );
        }
        Commands::Schedule {
            target,
            dedupe,
            out_csv,
            out_json,
        } => {
            let target: ScheduleTarget = target.parse()?;
            let projector = ScheduleProjector::new(&data, SystemClock).with_options(ProjectOptions {
                dedupe_identical: dedupe,
            });
            let entries = projector.schedule(target)?;
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &entries)?;
            }
            if let Some(path) = out_json {
                io::export_schedule_json(path, &entries)?;
            }
            let title = match target {
                ScheduleTarget::Date(d) => format!("{} {d}", target.day_of_week()),
                ScheduleTarget::Day(day) => day.to_string(),
            };
            print!("{}", renderer.render_schedule(&title, &entries));
        }
        Commands::Hours => {
            let hours = ScheduleProjector::new(&data, SystemClock).open_hours()?;
            print!("{}", renderer.render_hours(&hours));
        }
        Commands::Workers => {
            for s in Directory::new(data).summaries() {
                println!(
                    "{} | {} {} | {} | {} slot(s)",
                    s.worker.id,
                    s.worker.first_name,
                    s.worker.last_name,
                    if s.specialties.is_empty() { "-" } else { s.specialties.as_str() },
                    s.availability_count
                );
            }
        }
        Commands::Availability { worker } => {
            let dir = Directory::new(data);
            for a in dir.availability_of(worker)? {
                println!(
                    "{} | {} | {}",
                    a.id,
                    a.rule,
                    permanence::projector::format_window(a.start, a.end)
                );
            }
        }
        Commands::ImportWorkers { csv } => {
            require_import_admin(&data, cli.as_worker)?;
            let mut data = data;
            data.merge_workers(io::import_workers_csv(&csv).with_context(|| format!("importing {csv}"))?);
            storage.save(&data)?;
        }
        Commands::ImportMachines { csv } => {
            let mut data = data;
            data.merge_machines(io::import_machines_csv(&csv).with_context(|| format!("importing {csv}"))?);
            storage.save(&data)?;
        }
        Commands::ImportAvailability { csv } => {
            let mut data = data;
            data.merge_availability(
                io::import_availability_csv(&csv).with_context(|| format!("importing {csv}"))?,
            );
            storage.save(&data)?;
        }
        Commands::ImportSpecialties { csv } => {
            require_import_admin(&data, cli.as_worker)?;
            let mut data = data;
            data.merge_specialties(
                io::import_specialties_csv(&csv).with_context(|| format!("importing {csv}"))?,
            );
            storage.save(&data)?;
        }
        Commands::AddAvailability {
            worker,
            day,
            start,
            end,
        } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut dir = Directory::new(data);
            let id = dir.add_availability(&session, worker, SlotSpec::new(day, start, end))?;
            storage.save(dir.data())?;
            println!("availability {id} added");
        }
        Commands::RemoveAvailability { id } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut dir = Directory::new(data);
            dir.remove_availability(&session, id)?;
            storage.save(dir.data())?;
        }
        Commands::AddSpecialty { worker, machine } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut dir = Directory::new(data);
            let id = dir.add_specialty(&session, worker, machine)?;
            storage.save(dir.data())?;
            println!("specialty {id} added");
        }
        Commands::RemoveSpecialty { id } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut dir = Directory::new(data);
            dir.remove_specialty(&session, id)?;
            storage.save(dir.data())?;
        }
        Commands::ReplaceSchedule {
            worker,
            machines,
            slots,
        } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut dir = Directory::new(data);
            dir.replace_schedule(&session, worker, &machines, &slots)?;
            storage.save(dir.data())?;
            println!("schedule of worker {worker} replaced ({} slot(s))", slots.len());
        }
        Commands::AddWorker {
            first_name,
            last_name,
            phone,
            email,
            boss,
        } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut worker = Worker::new(WorkerId(0), first_name, last_name);
            worker.phone = phone;
            worker.email = email;
            worker.is_boss = boss;
            let mut dir = Directory::new(data);
            let id = dir.add_worker(&session, worker)?;
            storage.save(dir.data())?;
            println!("worker {id} added");
        }
        Commands::EditWorker {
            worker,
            first_name,
            last_name,
            phone,
            email,
            boss,
        } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut dir = Directory::new(data);
            let mut changes = dir
                .data()
                .find_worker(worker)
                .cloned()
                .with_context(|| format!("unknown worker: {worker}"))?;
            if let Some(first) = first_name {
                changes.first_name = first;
            }
            if let Some(last) = last_name {
                changes.last_name = last;
            }
            if phone.is_some() {
                changes.phone = phone;
            }
            if email.is_some() {
                changes.email = email;
            }
            if let Some(boss) = boss {
                changes.is_boss = boss;
            }
            dir.update_worker(&session, worker, changes)?;
            storage.save(dir.data())?;
            println!("worker {worker} updated");
        }
        Commands::RemoveWorker { worker } => {
            let session = CurrentUser::refresh(&data, cli.as_worker);
            let mut dir = Directory::new(data);
            dir.remove_worker(&session, worker)?;
            storage.save(dir.data())?;
        }
    }

    Ok(())
}

/// Un jeu de données sans membre s'amorce sans session ; ensuite l'import est réservé aux admins.
fn require_import_admin(data: &Dataset, as_worker: Option<WorkerId>) -> Result<()> {
    if data.workers.is_empty() {
        return Ok(());
    }
    require_admin(&CurrentUser::refresh(data, as_worker))?;
    Ok(())
}
