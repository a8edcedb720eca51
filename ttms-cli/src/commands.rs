use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
pub enum Command {
    /// Store a session issued by the login page.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Show the stored session identifier and the server's verdict on it.
    Status,
    /// Evaluate a route transition as the navigation guard would.
    Navigate(NavigateArgs),
    /// Get all curricula.
    Curricula,
    /// Get the curriculum of an intake cohort.
    Cohort(CohortArgs),
    /// Get students of an academic session and semester.
    Students(StudentsArgs),
    /// Get lecturers of an academic session and semester.
    Lecturers(LecturersArgs),
    /// Get students registered in a subject section.
    SubjectStudents(SubjectStudentsArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["session_id", "record"])))]
pub struct LoginArgs {
    /// Session identifier issued by the service
    #[arg(short, long)]
    pub(crate) session_id: Option<String>,
    /// Full session record as returned by the service, in JSON
    #[arg(short, long)]
    pub(crate) record: Option<String>,
}

#[derive(Parser, Debug)]
pub struct NavigateArgs {
    /// Requested route path, e.g. `/timetable`
    pub(crate) path: String,
}

#[derive(Parser, Debug)]
pub struct CohortArgs {
    /// Intake session of the cohort, e.g. `2023/2024`
    #[arg(short, long)]
    pub(crate) cohort: String,
}

#[derive(Parser, Debug)]
pub struct TermArgs {
    /// Academic session, e.g. `2024/2025`
    #[arg(long)]
    pub(crate) sesi: String,
    /// Semester, e.g. `1` or `2`
    #[arg(long)]
    pub(crate) semester: String,
}

#[derive(Parser, Debug)]
pub struct StudentsArgs {
    #[command(flatten)]
    pub(crate) term: TermArgs,
    /// Number of students per page
    #[arg(long, default_value = "3")]
    pub(crate) limit: u32,
    /// Number of students to skip
    #[arg(long, default_value = "0")]
    pub(crate) offset: u32,
    /// Additional filter, as `key=value`
    #[arg(short, long = "filter", value_parser = parse_key_value)]
    pub(crate) filters: Vec<(String, String)>,
}

#[derive(Parser, Debug)]
pub struct LecturersArgs {
    #[command(flatten)]
    pub(crate) term: TermArgs,
    /// Additional query parameter, as `key=value`
    #[arg(short, long = "param", value_parser = parse_key_value)]
    pub(crate) params: Vec<(String, String)>,
}

#[derive(Parser, Debug)]
pub struct SubjectStudentsArgs {
    #[command(flatten)]
    pub(crate) term: TermArgs,
    /// Subject code, e.g. `SECJ1013`
    #[arg(long)]
    pub(crate) kod_subjek: String,
    /// Section number, e.g. `01`
    #[arg(long)]
    pub(crate) seksyen: String,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.into(), value.into())),
        _ => Err(format!("expected `key=value`, got `{s}`")),
    }
}
