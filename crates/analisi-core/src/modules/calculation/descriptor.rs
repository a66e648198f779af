use serde::{Deserialize, Serialize};

/// One executable invocation inside a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInfo {
    pub code: String,
    pub cmdline_params: Vec<String>,
    pub stdout_name: String,
    pub withmpi: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopySpec {
    pub source: String,
    pub target: String,
}

/// Job descriptor handed to the host: what to run and which files move
/// in and out of the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcInfo {
    pub codes_info: Vec<CodeInfo>,
    pub local_copy_list: Vec<CopySpec>,
    pub remote_copy_list: Vec<CopySpec>,
    pub remote_symlink_list: Vec<CopySpec>,
    pub retrieve_list: Vec<String>,
}

impl CalcInfo {
    pub fn single_code(code_info: CodeInfo, retrieve_list: Vec<String>) -> Self {
        Self {
            codes_info: vec![code_info],
            local_copy_list: Vec::new(),
            remote_copy_list: Vec::new(),
            remote_symlink_list: Vec::new(),
            retrieve_list,
        }
    }
}
