use inews_core::Error;
use std::fmt;
use std::str::FromStr;

/// One named request/response entry exposed to the UI process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    // Requests
    GetHeadlines,
    GetSearchResults,
    GetOpenAIResponse,
    GetHuggingFaceResponse,
    // Loaders
    LoadTodayHeadlines,
    LoadPrevHeadlines,
    LoadSearchResults,
    LoadFolderCoverImg,
    // Settings
    LoadApiKeys,
    LoadHeadlineSettings,
    WriteApiKeys,
    WriteHeadlineSettings,
    RemoveTodayHeadlines,
    // Folders
    LoadUserFolders,
    CreateUserFolder,
    RemoveUserFolder,
    LoadFolderContents,
    AddArticleToFolder,
    RemoveArticleFromFolder,
}

impl Channel {
    pub const ALL: [Channel; 19] = [
        Channel::GetHeadlines,
        Channel::GetSearchResults,
        Channel::GetOpenAIResponse,
        Channel::GetHuggingFaceResponse,
        Channel::LoadTodayHeadlines,
        Channel::LoadPrevHeadlines,
        Channel::LoadSearchResults,
        Channel::LoadFolderCoverImg,
        Channel::LoadApiKeys,
        Channel::LoadHeadlineSettings,
        Channel::WriteApiKeys,
        Channel::WriteHeadlineSettings,
        Channel::RemoveTodayHeadlines,
        Channel::LoadUserFolders,
        Channel::CreateUserFolder,
        Channel::RemoveUserFolder,
        Channel::LoadFolderContents,
        Channel::AddArticleToFolder,
        Channel::RemoveArticleFromFolder,
    ];

    /// The wire name the UI process invokes
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::GetHeadlines => "getHeadlines",
            Channel::GetSearchResults => "getSearchResults",
            Channel::GetOpenAIResponse => "getOpenAIResponse",
            Channel::GetHuggingFaceResponse => "getHuggingFaceResponse",
            Channel::LoadTodayHeadlines => "loadTodayHeadlines",
            Channel::LoadPrevHeadlines => "loadPrevHeadlines",
            Channel::LoadSearchResults => "loadSearchResults",
            Channel::LoadFolderCoverImg => "loadFolderCoverImg",
            Channel::LoadApiKeys => "loadApiKeys",
            Channel::LoadHeadlineSettings => "loadHeadlineSettings",
            Channel::WriteApiKeys => "writeApiKeys",
            Channel::WriteHeadlineSettings => "writeHeadlineSettings",
            Channel::RemoveTodayHeadlines => "removeTodayHeadlines",
            Channel::LoadUserFolders => "loadUserFolders",
            Channel::CreateUserFolder => "createUserFolder",
            Channel::RemoveUserFolder => "removeUserFolder",
            Channel::LoadFolderContents => "loadFolderContents",
            Channel::AddArticleToFolder => "addArticleToFolder",
            Channel::RemoveArticleFromFolder => "removeArticleFromFolder",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownChannel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_channel_round_trips() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
        let names: HashSet<_> = Channel::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), 19);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("loadtodayheadlines".parse::<Channel>().is_err());
        assert!(matches!(
            "deleteEverything".parse::<Channel>(),
            Err(Error::UnknownChannel(name)) if name == "deleteEverything"
        ));
    }
}
