//! Native desktop background setter.
//!
//! Shells out to the platform's own tooling. On Linux the desktop environment
//! is taken from `XDG_CURRENT_DESKTOP`; when its command fails, `nitrogen` is
//! tried as a last resort.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use easel_core::{BackgroundSetter, WallpaperError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Unsupported,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Unsupported,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Unsupported => std::env::consts::OS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinuxDesktop {
    Gnome,
    Kde,
    Xfce,
    Mate,
    Cinnamon,
    Other,
}

impl LinuxDesktop {
    /// Classify an `XDG_CURRENT_DESKTOP` value (e.g. `ubuntu:GNOME`).
    pub fn from_xdg(value: &str) -> Self {
        let value = value.to_lowercase();
        let has = |name: &str| value.contains(name);

        if has("gnome") || has("unity") || has("budgie") {
            Self::Gnome
        } else if has("kde") || has("plasma") {
            Self::Kde
        } else if has("xfce") {
            Self::Xfce
        } else if has("mate") {
            Self::Mate
        } else if has("cinnamon") {
            Self::Cinnamon
        } else {
            Self::Other
        }
    }

    pub fn detect() -> Self {
        Self::from_xdg(&std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default())
    }
}

/// One external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    async fn run(&self) -> Result<(), String> {
        debug!("Running {} {:?}", self.program, self.args);

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| format!("run {}: {}", self.program, e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(if stderr.is_empty() {
            format!("{} exited with {}", self.program, output.status)
        } else {
            stderr
        })
    }
}

fn file_uri(path: &str) -> String {
    format!("file://{path}")
}

fn kde_script(uri: &str) -> String {
    format!(
        "var allDesktops = desktops();\n\
         for (var i = 0; i < allDesktops.length; i++) {{\n\
           var d = allDesktops[i];\n\
           d.wallpaperPlugin = 'org.kde.image';\n\
           d.currentConfigGroup = ['Wallpaper', 'org.kde.image', 'General'];\n\
           d.writeConfig('Image', '{uri}');\n\
         }}\n"
    )
}

fn powershell_script(path: &str) -> String {
    format!(
        "Add-Type -TypeDefinition @\"\n\
         using System;\n\
         using System.Runtime.InteropServices;\n\
         public class Wallpaper {{\n\
           [DllImport(\"user32.dll\", CharSet = CharSet.Auto)]\n\
           public static extern int SystemParametersInfo(int uAction, int uParam, string lpvParam, int fuWinIni);\n\
         }}\n\
         \"@\n\
         [Wallpaper]::SystemParametersInfo(0x0014, 0, '{}', 0x0001 -bor 0x0002)",
        path.replace('/', "\\").replace('\'', "''")
    )
}

/// Commands that apply `path`, run in order. All must succeed.
pub fn commands_for(platform: Platform, desktop: LinuxDesktop, path: &str) -> Vec<Invocation> {
    match platform {
        Platform::MacOs => {
            let script = format!(
                "tell application \"System Events\" to tell every desktop to set picture to \"{}\"",
                path.replace('"', "\\\"")
            );
            vec![Invocation::new("osascript", ["-e".to_string(), script])]
        }
        Platform::Windows => vec![Invocation::new(
            "powershell",
            ["-NoProfile".to_string(), "-Command".to_string(), powershell_script(path)],
        )],
        Platform::Linux => linux_commands(desktop, path),
        Platform::Unsupported => Vec::new(),
    }
}

fn linux_commands(desktop: LinuxDesktop, path: &str) -> Vec<Invocation> {
    let uri = file_uri(path);
    let uri = uri.as_str();

    match desktop {
        LinuxDesktop::Gnome => vec![
            Invocation::new(
                "gsettings",
                ["set", "org.gnome.desktop.background", "picture-uri", uri],
            ),
            Invocation::new(
                "gsettings",
                ["set", "org.gnome.desktop.background", "picture-uri-dark", uri],
            ),
        ],
        LinuxDesktop::Kde => vec![Invocation::new(
            "qdbus",
            [
                "org.kde.plasmashell".to_string(),
                "/PlasmaShell".to_string(),
                "org.kde.PlasmaShell.evaluateScript".to_string(),
                kde_script(uri),
            ],
        )],
        LinuxDesktop::Xfce => vec![Invocation::new(
            "xfconf-query",
            [
                "-c",
                "xfce4-desktop",
                "-p",
                "/backdrop/screen0/monitor0/workspace0/last-image",
                "-s",
                path,
            ],
        )],
        LinuxDesktop::Mate => vec![Invocation::new(
            "gsettings",
            ["set", "org.mate.background", "picture-filename", path],
        )],
        LinuxDesktop::Cinnamon => vec![Invocation::new(
            "gsettings",
            ["set", "org.cinnamon.desktop.background", "picture-uri", uri],
        )],
        LinuxDesktop::Other => vec![Invocation::new("feh", ["--bg-fill", path])],
    }
}

/// Last resort on Linux when the desktop's own command fails.
pub fn linux_fallback(path: &str) -> Invocation {
    Invocation::new("nitrogen", ["--set-zoom-fill", path])
}

/// [`BackgroundSetter`] backed by the platform's command line tools.
#[derive(Debug, Clone)]
pub struct CommandSetter {
    platform: Platform,
    desktop: LinuxDesktop,
}

impl CommandSetter {
    pub fn new(platform: Platform, desktop: LinuxDesktop) -> Self {
        Self { platform, desktop }
    }

    /// Setter for the running system.
    pub fn detect() -> Self {
        let platform = Platform::current();
        let desktop = if platform == Platform::Linux {
            LinuxDesktop::detect()
        } else {
            LinuxDesktop::Other
        };
        Self::new(platform, desktop)
    }

    fn failed(&self, message: String) -> WallpaperError {
        WallpaperError::CommandFailed {
            platform: self.platform.name().to_string(),
            message,
        }
    }
}

async fn run_all(commands: &[Invocation]) -> Result<(), String> {
    for command in commands {
        command.run().await?;
    }
    Ok(())
}

#[async_trait]
impl BackgroundSetter for CommandSetter {
    fn platform(&self) -> &str {
        self.platform.name()
    }

    async fn set_wallpaper(&self, image_path: &Path) -> Result<(), WallpaperError> {
        if !image_path.is_file() {
            return Err(WallpaperError::FileNotFound(image_path.display().to_string()));
        }

        let path = image_path.to_string_lossy();
        let commands = commands_for(self.platform, self.desktop, &path);
        if commands.is_empty() {
            return Err(WallpaperError::UnsupportedPlatform(self.platform.name().to_string()));
        }

        match run_all(&commands).await {
            Ok(()) => Ok(()),
            Err(message) if self.platform == Platform::Linux => {
                warn!("{:?} wallpaper command failed ({}), trying nitrogen", self.desktop, message);
                linux_fallback(&path)
                    .run()
                    .await
                    .map_err(|_| self.failed(message))
            }
            Err(message) => Err(self.failed(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_xdg_desktops() {
        assert_eq!(LinuxDesktop::from_xdg("ubuntu:GNOME"), LinuxDesktop::Gnome);
        assert_eq!(LinuxDesktop::from_xdg("Budgie:GNOME"), LinuxDesktop::Gnome);
        assert_eq!(LinuxDesktop::from_xdg("KDE"), LinuxDesktop::Kde);
        assert_eq!(LinuxDesktop::from_xdg("XFCE"), LinuxDesktop::Xfce);
        assert_eq!(LinuxDesktop::from_xdg("MATE"), LinuxDesktop::Mate);
        assert_eq!(LinuxDesktop::from_xdg("X-Cinnamon"), LinuxDesktop::Cinnamon);
        assert_eq!(LinuxDesktop::from_xdg(""), LinuxDesktop::Other);
        assert_eq!(LinuxDesktop::from_xdg("i3"), LinuxDesktop::Other);
    }

    #[test]
    fn gnome_sets_light_and_dark() {
        let commands = commands_for(Platform::Linux, LinuxDesktop::Gnome, "/w/a.jpg");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].args[2], "picture-uri");
        assert_eq!(commands[1].args[2], "picture-uri-dark");
        assert!(commands.iter().all(|c| c.args[3] == "file:///w/a.jpg"));
    }

    #[test]
    fn kde_uses_plasma_script() {
        let commands = commands_for(Platform::Linux, LinuxDesktop::Kde, "/w/a.jpg");
        assert_eq!(commands[0].program, "qdbus");
        assert!(commands[0].args[3].contains("d.writeConfig('Image', 'file:///w/a.jpg');"));
    }

    #[test]
    fn mate_uses_plain_path() {
        let commands = commands_for(Platform::Linux, LinuxDesktop::Mate, "/w/a.jpg");
        assert_eq!(
            commands,
            vec![Invocation::new(
                "gsettings",
                ["set", "org.mate.background", "picture-filename", "/w/a.jpg"]
            )]
        );
    }

    #[test]
    fn other_desktops_use_feh_then_nitrogen() {
        let commands = commands_for(Platform::Linux, LinuxDesktop::Other, "/w/a.jpg");
        assert_eq!(commands[0].program, "feh");
        assert_eq!(linux_fallback("/w/a.jpg").args, vec!["--set-zoom-fill", "/w/a.jpg"]);
    }

    #[test]
    fn windows_path_uses_backslashes() {
        let commands = commands_for(Platform::Windows, LinuxDesktop::Other, "C:/Users/u/a.jpg");
        assert!(commands[0].args[2].contains("'C:\\Users\\u\\a.jpg'"));
    }

    #[test]
    fn macos_uses_osascript() {
        let commands = commands_for(Platform::MacOs, LinuxDesktop::Other, "/Users/u/a.jpg");
        assert_eq!(commands[0].program, "osascript");
        assert!(commands[0].args[1].contains("set picture to \"/Users/u/a.jpg\""));
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let setter = CommandSetter::new(Platform::Linux, LinuxDesktop::Other);
        let err = setter
            .set_wallpaper(Path::new("/nonexistent/wallpaper.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, WallpaperError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn unsupported_platform_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let setter = CommandSetter::new(Platform::Unsupported, LinuxDesktop::Other);

        let err = setter.set_wallpaper(file.path()).await.unwrap_err();
        assert!(matches!(err, WallpaperError::UnsupportedPlatform(_)));
    }
}
