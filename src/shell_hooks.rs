//! Shell integration for `wd`
//!
//! A child process cannot change its parent's working directory, so the
//! shell gets a `wd` function wrapping the binary. The function points
//! `WD_CD_FILE` at a temp file, runs the binary, and `cd`s to whatever path
//! the binary left there. It also registers tab completion backed by
//! `wd --complete <LINE>`.

use serde::{Deserialize, Serialize};

const BIN_PLACEHOLDER: &str = "__WD_BIN__";

/// Supported shell types
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl ShellType {
    /// Detect shell type from shell path or name
    pub fn detect(shell: &str) -> Option<Self> {
        let shell_lower = shell.to_lowercase();
        if shell_lower.contains("bash") {
            Some(ShellType::Bash)
        } else if shell_lower.contains("zsh") {
            Some(ShellType::Zsh)
        } else if shell_lower.contains("fish") {
            Some(ShellType::Fish)
        } else if shell_lower.contains("pwsh") || shell_lower.contains("powershell") {
            Some(ShellType::PowerShell)
        } else {
            None
        }
    }
}

pub struct ShellHooks {
    shell: ShellType,
    bin: String,
}

impl ShellHooks {
    /// Hooks for `shell`, invoking the binary as `bin`
    pub fn new(shell: ShellType, bin: impl Into<String>) -> Self {
        Self {
            shell,
            bin: bin.into(),
        }
    }

    pub fn shell_type(&self) -> ShellType {
        self.shell
    }

    /// Script to `eval`/`source` from the shell's rc file
    pub fn get_init_script(&self) -> String {
        let template = match self.shell {
            ShellType::Bash => BASH_INIT,
            ShellType::Zsh => ZSH_INIT,
            ShellType::Fish => FISH_INIT,
            ShellType::PowerShell => POWERSHELL_INIT,
        };
        template.replace(BIN_PLACEHOLDER, &self.bin)
    }

    /// One-line snippet for the rc file
    pub fn get_rc_snippet(&self) -> String {
        match self.shell {
            ShellType::Bash => format!("eval \"$({} --init bash)\"", self.bin),
            ShellType::Zsh => format!("eval \"$({} --init zsh)\"", self.bin),
            ShellType::Fish => format!("{} --init fish | source", self.bin),
            ShellType::PowerShell => {
                format!("Invoke-Expression (& {} --init powershell | Out-String)", self.bin)
            }
        }
    }
}

const BASH_INIT: &str = r#"
# wd: warp to bookmarked directories
wd() {
    local __wd_cd_file __wd_status
    __wd_cd_file="$(mktemp "${TMPDIR:-/tmp}/wd.XXXXXX")" || return 1
    WD_CD_FILE="$__wd_cd_file" command __WD_BIN__ "$@"
    __wd_status=$?
    if [ -s "$__wd_cd_file" ]; then
        builtin cd -- "$(cat "$__wd_cd_file")" || __wd_status=$?
    fi
    rm -f -- "$__wd_cd_file"
    return $__wd_status
}

_wd_complete() {
    local IFS=$'\n'
    COMPREPLY=($(command __WD_BIN__ --complete "${COMP_LINE:0:$COMP_POINT}"))
    # Folder candidates end in '/' and keep completing without a space
    if [[ ${#COMPREPLY[@]} -eq 1 && ${COMPREPLY[0]} == */ ]]; then
        compopt -o nospace
    fi
}
complete -F _wd_complete wd
"#;

const ZSH_INIT: &str = r#"
# wd: warp to bookmarked directories
wd() {
    local __wd_cd_file __wd_status
    __wd_cd_file="$(mktemp "${TMPDIR:-/tmp}/wd.XXXXXX")" || return 1
    WD_CD_FILE="$__wd_cd_file" command __WD_BIN__ "$@"
    __wd_status=$?
    if [[ -s "$__wd_cd_file" ]]; then
        builtin cd -- "$(<"$__wd_cd_file")" || __wd_status=$?
    fi
    rm -f -- "$__wd_cd_file"
    return $__wd_status
}

_wd_complete() {
    local -a suggestions folders
    suggestions=("${(@f)$(command __WD_BIN__ --complete "${(j: :)words[1,CURRENT]}")}")
    folders=(${(M)suggestions:#*/})
    compadd -- ${suggestions:#*/}
    (( $#folders )) && compadd -S '' -- $folders
}
(( $+functions[compdef] )) && compdef _wd_complete wd
"#;

const FISH_INIT: &str = r#"
# wd: warp to bookmarked directories
function wd
    set -l __wd_cd_file (mktemp)
    env WD_CD_FILE=$__wd_cd_file __WD_BIN__ $argv
    set -l __wd_status $status
    if test -s $__wd_cd_file
        cd (cat $__wd_cd_file)
    end
    rm -f $__wd_cd_file
    return $__wd_status
end

complete -c wd -f -a '(command __WD_BIN__ --complete (commandline -cp))'
"#;

const POWERSHELL_INIT: &str = r#"
# wd: warp to bookmarked directories
function global:wd {
    $cdFile = [System.IO.Path]::GetTempFileName()
    $env:WD_CD_FILE = $cdFile
    try {
        $bin = Get-Command __WD_BIN__ -CommandType Application | Select-Object -First 1
        & $bin @args
        $status = $LASTEXITCODE
    } finally {
        Remove-Item Env:WD_CD_FILE -ErrorAction SilentlyContinue
    }
    if ((Get-Item $cdFile).Length -gt 0) {
        Set-Location -LiteralPath (Get-Content -Raw $cdFile)
    }
    Remove-Item -Force $cdFile
    $global:LASTEXITCODE = $status
}

Register-ArgumentCompleter -Native -CommandName wd -ScriptBlock {
    param($wordToComplete, $commandAst, $cursorPosition)
    $line = $commandAst.ToString()
    $end = [Math]::Min($line.Length, $cursorPosition - $commandAst.Extent.StartOffset)
    $bin = Get-Command __WD_BIN__ -CommandType Application | Select-Object -First 1
    & $bin --complete $line.Substring(0, $end) | ForEach-Object {
        [System.Management.Automation.CompletionResult]::new($_, $_, 'ParameterValue', $_)
    }
}
"#;
