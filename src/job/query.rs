pub const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

pub const INSERT_JOB: &str = "
    INSERT INTO jobs (title, salary, equity, company_handle)
    VALUES ($1, $2, $3, $4)
    RETURNING id, title, salary, equity, company_handle
";

pub const GET_ALL_JOBS: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
    ORDER BY title
";

pub const GET_JOB_BY_TITLE: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
    WHERE title = $1
";

pub const GET_JOB_BY_ID: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
    WHERE id = $1
";

pub const FILTER_JOBS_BY_TITLE: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
    WHERE instr(unicode_lower(title), unicode_lower($1)) > 0
    ORDER BY title
";

pub const FILTER_JOBS_BY_MIN_SALARY: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
    WHERE salary >= $1
    ORDER BY title
";

pub const FILTER_JOBS_WITH_EQUITY: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
    WHERE equity IS NOT NULL
    ORDER BY title
";

pub const DELETE_JOB_BY_TITLE: &str = "
    DELETE
    FROM jobs
    WHERE title = $1
";
