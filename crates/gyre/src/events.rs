use appdex::desktop::AppInfo;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    EnterEdit,
    AddIcon(AppInfo),
    AppsIndexed(Vec<AppInfo>),
    ConfigReload,
}
