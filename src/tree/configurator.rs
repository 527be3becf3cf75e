use std::{
    fmt::{self, Debug, Formatter},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{
    path::{self, PathSegment},
    Attribute,
    ConfigOption,
    Materialization,
    Section,
    SectionId,
    SectionNode,
    SectionSelector,
};
use crate::{
    document::{
        Document,
        DocumentStore,
        ElementId,
        LoadedDocument,
        XmlFileStore,
        OPTION_NAME_ATTRIBUTE,
        OPTION_TAG,
    },
    error::{ConfiguratorError, Result, StoreError},
    logging::Logger,
};


/// A configurator shared between threads. The mutex guards whole
/// read-modify-persist sequences; hold it across an `ensure` and the writes
/// that depend on it.
pub type SharedConfigurator = Arc<Mutex<Configurator>>;


/// How a configuration file path is interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Scope {
    /// Relative to the home directory of the current user.
    #[default]
    Local,
    /// Used as given (a leading `~/` is still expanded).
    Global,
}


/// Result of walking a path as far as it resolves.
enum Resolution {
    Found(SectionId),
    Missing {
        /// Last section that did resolve, `None` if not even the first segment did.
        deepest: Option<SectionId>,
        /// Number of segments that resolved.
        resolved: usize,
    },
}


/// Root of a configuration tree and sole writer of its backing document.
///
/// The document is loaded on first access; from then on every mutation is
/// materialized into the document and the whole document is persisted
/// before the call returns.
pub struct Configurator {
    store: Box<dyn DocumentStore>,
    scope: Scope,
    logger: Logger,
    document: Option<Document>,
    sections: Vec<SectionNode>,
    top_level_sections: Vec<SectionId>,
}

impl Configurator {
    /// Creates a configurator backed by an XML file.
    ///
    /// Nothing is read or written until the document is first needed.
    pub fn new<P: AsRef<Path>>(
        configuration_file_path: P,
        scope: Scope,
        logger: Logger,
    ) -> Result<Self, StoreError> {
        let file_path = resolve_file_path(configuration_file_path.as_ref(), scope)?;

        {
            let _log = logger.enter();
            debug!("Configuration file path is {}.", file_path.display());
        }

        Ok(Self {
            store: Box::new(XmlFileStore::new(file_path)),
            scope,
            logger,
            document: None,
            sections: Vec::new(),
            top_level_sections: Vec::new(),
        })
    }

    /// Creates a configurator on top of an arbitrary store.
    pub fn with_store<S>(store: S, logger: Logger) -> Self
    where
        S: DocumentStore + 'static,
    {
        Self {
            store: Box::new(store),
            scope: Scope::Global,
            logger,
            document: None,
            sections: Vec::new(),
            top_level_sections: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedConfigurator {
        Arc::new(Mutex::new(self))
    }

    pub fn file_path(&self) -> &Path {
        self.store.location()
    }

    pub fn is_global(&self) -> bool {
        self.scope == Scope::Global
    }

    /// The in-memory document, if it has been loaded.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// View of a section, `None` if `id` was not issued by this configurator.
    pub fn section(&self, id: SectionId) -> Option<Section<'_>> {
        self.sections
            .get(id.0)
            .map(|node| Section::new(self, id, node))
    }


    /// Whether a section equal to `section` exists anywhere in this tree.
    pub fn contains(&self, section: &Section<'_>) -> bool {
        self.top_level_sections
            .iter()
            .filter_map(|id| self.section(*id))
            .any(|top_level| top_level == *section || top_level.contains_descendant(section))
    }


    /*
     * Document lifecycle
     */

    /// Loads the backing document, creating an empty one if there is none.
    ///
    /// A document that cannot be parsed is deleted and replaced by an empty
    /// one. Its contents are lost; only a warning is logged.
    pub fn ensure_document_exists(&mut self) -> Result<&Document> {
        let _log = self.logger.enter();

        if self.document.is_none() {
            let document = self.load_or_create_document()?;
            self.load_sections(&document);
            self.document = Some(document);
        }

        Ok(&*self.document_mut())
    }

    fn load_or_create_document(&mut self) -> Result<Document> {
        match self.store.load() {
            Ok(LoadedDocument::Loaded(document)) => {
                debug!("Loaded configuration from {}.", self.file_path().display());
                Ok(document)
            }
            Ok(LoadedDocument::Missing) => {
                info!(
                    "Creating empty configuration at {}.",
                    self.file_path().display()
                );
                self.create_empty_document()
            }
            Err(StoreError::DocumentCorrupt { path, reason }) => {
                warn!(
                    "Configuration at {} is corrupt ({reason}); discarding it.",
                    path.display()
                );
                self.store.discard()?;
                self.create_empty_document()
            }
            Err(error) => Err(error.into()),
        }
    }

    fn create_empty_document(&mut self) -> Result<Document> {
        let document = Document::empty();
        self.store.save(&document)?;
        Ok(document)
    }

    /// Rebuilds sections and options from a freshly loaded document.
    fn load_sections(&mut self, document: &Document) {
        self.sections.clear();
        self.top_level_sections.clear();

        for child in document.element(document.root()).children() {
            if document.element(*child).tag() == OPTION_TAG {
                warn!("Ignoring option element outside of any section.");
                continue;
            }

            let id = self.load_section(document, *child, None);
            self.top_level_sections.push(id);
        }
    }

    fn load_section(
        &mut self,
        document: &Document,
        element: ElementId,
        parent: Option<SectionId>,
    ) -> SectionId {
        let source = document.element(element);
        let attributes = source
            .attributes()
            .iter()
            .map(|(name, value)| Attribute::new(name.as_str(), value.as_str()))
            .collect();

        let id = SectionId(self.sections.len());
        let mut node = SectionNode::new(source.tag().to_string(), parent, attributes);
        node.state = Materialization::Materialized(element);
        self.sections.push(node);

        for child in source.children() {
            let child_element = document.element(*child);

            if child_element.tag() != OPTION_TAG {
                let sub_section = self.load_section(document, *child, Some(id));
                self.sections[id.0].sub_sections.push(sub_section);
                continue;
            }

            let Some(name) = child_element.attribute(OPTION_NAME_ATTRIBUTE) else {
                warn!("Ignoring option without a name in <{}>.", source.tag());
                continue;
            };

            let mut option = ConfigOption::new(
                name.to_string(),
                child_element.text().unwrap_or_default().to_string(),
                id,
            );
            option.element = Some(*child);
            self.sections[id.0].options.push(option);
        }

        id
    }

    /// Writes the whole document to the backing store.
    ///
    /// Sections that are not materialized (for example after
    /// [`Self::invalidate_element`]) are materialized first.
    pub fn persist(&mut self) -> Result<()> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;

        for id in self.top_level_sections.clone() {
            self.materialize_subtree(id)?;
        }

        let document = self.document.get_or_insert_with(Document::empty);
        self.store.save(document)?;

        debug!("Persisted configuration to {}.", self.file_path().display());
        Ok(())
    }

    fn document_mut(&mut self) -> &mut Document {
        self.document.get_or_insert_with(Document::empty)
    }


    /*
     * Materialization
     */

    /// The element backing `section`, creating it (and any missing ancestor
    /// elements) on first access.
    pub fn get_element(&mut self, section: SectionId) -> Result<ElementId> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;

        self.materialize(section)
    }

    /// Drops the element of `section` (and with it, its subtree) from the
    /// document. The next access re-creates and re-attaches it.
    pub fn invalidate_element(&mut self, section: SectionId) -> Result<()> {
        let _log = self.logger.enter();
        self.node(section)?;

        if let Materialization::Materialized(element) = self.sections[section.0].state {
            self.document_mut().detach(element);
        }
        self.mark_unmaterialized(section);

        Ok(())
    }

    fn mark_unmaterialized(&mut self, section: SectionId) {
        let node = &mut self.sections[section.0];
        node.state = Materialization::Unmaterialized;
        for option in &mut node.options {
            option.element = None;
        }

        for sub_section in node.sub_sections.clone() {
            self.mark_unmaterialized(sub_section);
        }
    }

    /// Materializes `section` with its whole subtree and persists the document.
    pub fn trigger_update(&mut self, section: SectionId) -> Result<()> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;

        self.materialize_subtree(section)?;
        self.persist()
    }

    fn materialize(&mut self, section: SectionId) -> Result<ElementId> {
        let node = self.node(section)?;
        if let Materialization::Materialized(element) = node.state {
            return Ok(element);
        }

        let parent = node.parent;

        // Parents first: a child element can only be appended to an attached parent.
        let parent_element = match parent {
            Some(parent) => self.materialize(parent)?,
            None => self.document_mut().root(),
        };

        let node = &self.sections[section.0];
        let name = node.name.clone();
        let attributes = node.attributes.clone();

        let document = self.document_mut();
        let element = document.create_element(name);
        for attribute in &attributes {
            document.set_attribute(element, attribute.name(), attribute.value());
        }
        document.append_child(parent_element, element);

        self.sections[section.0].state = Materialization::Materialized(element);
        debug!("Materialized section {}.", self.describe(section));

        Ok(element)
    }

    /// Materializes `section`, its options and all of its subsections.
    fn materialize_subtree(&mut self, section: SectionId) -> Result<()> {
        let element = self.materialize(section)?;

        let document = self.document.get_or_insert_with(Document::empty);
        for option in &mut self.sections[section.0].options {
            match option.element {
                Some(option_element) => document.set_text(option_element, option.value()),
                None => {
                    let option_element = document.create_element(OPTION_TAG);
                    document.set_attribute(option_element, OPTION_NAME_ATTRIBUTE, option.name());
                    document.set_text(option_element, option.value());
                    document.append_child(element, option_element);
                    option.element = Some(option_element);
                }
            }
        }

        for sub_section in self.sections[section.0].sub_sections.clone() {
            self.materialize_subtree(sub_section)?;
        }

        Ok(())
    }


    /*
     * Sections
     */

    /// Creates a new section from `name` (which may carry an attribute list,
    /// e.g. `Binary[name=tool]`), below `parent` or at the top level.
    ///
    /// Always creates, even if an identical sibling exists; use
    /// [`Self::ensure_section_path`] for idempotent creation.
    pub fn add_section(&mut self, name: &str, parent: Option<SectionId>) -> Result<SectionId> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;

        let selector = SectionSelector::parse(name)?;
        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let section = self.insert_section(selector, parent);
        info!("Added section {}.", self.describe(section));

        self.trigger_update(section)?;
        Ok(section)
    }

    /// Creates a new child of `section`. See [`Self::add_section`].
    pub fn add_sub_section(&mut self, section: SectionId, name: &str) -> Result<SectionId> {
        self.add_section(name, Some(section))
    }

    /// Creates the whole chain `path` below `section`, one new section per
    /// segment, and returns the last one. Existing sections are not reused.
    pub fn create_sub_section_by_path(
        &mut self,
        section: SectionId,
        path: &str,
    ) -> Result<SectionId> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;
        self.node(section)?;

        let selectors = parse_selectors(path, &path::split_path(path)?)?;
        let (_, last) = self.create_chain(Some(section), selectors)?;

        self.trigger_update(section)?;
        Ok(last)
    }

    /// Adds an attribute to `section`, replacing one with the same name.
    pub fn add_attribute(&mut self, section: SectionId, name: &str, value: &str) -> Result<()> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;
        self.node(section)?;
        path::validate_xml_name(name, 0, name)?;
        path::validate_value(value)?;

        self.sections[section.0].put_attribute(Attribute::new(name, value));

        if let Materialization::Materialized(element) = self.sections[section.0].state {
            self.document_mut().set_attribute(element, name, value);
        }

        self.trigger_update(section)
    }

    pub fn get_top_level_sections(&mut self) -> Result<&[SectionId]> {
        self.ensure_document_exists()?;
        Ok(&self.top_level_sections)
    }

    /// First top-level section called `name` whose attributes contain `attributes`.
    pub fn get_top_level_section(
        &mut self,
        name: &str,
        attributes: Option<&[Attribute]>,
    ) -> Result<Option<SectionId>> {
        self.ensure_document_exists()?;

        let attributes = attributes.unwrap_or_default();
        Ok(self.top_level_sections.iter().copied().find(|id| {
            let node = &self.sections[id.0];
            node.name == name && super::attribute::contains_all(&node.attributes, attributes)
        }))
    }

    /// First child of `section` selected by `selector` (`name` or `name[k=v,...]`).
    ///
    /// Attribute matching is a containment test: the child may carry
    /// attributes the selector does not mention.
    pub fn get_sub_section(&self, section: SectionId, selector: &str) -> Result<Option<SectionId>> {
        let selector = SectionSelector::parse(selector)?;
        let node = self.node(section)?;

        Ok(self.first_match(&node.sub_sections, &selector))
    }

    /// Every child of `section` selected by `selector`, in order.
    pub fn find_sub_sections(&self, section: SectionId, selector: &str) -> Result<Vec<SectionId>> {
        let selector = SectionSelector::parse(selector)?;
        let node = self.node(section)?;

        Ok(node
            .sub_sections
            .iter()
            .copied()
            .filter(|id| self.sections[id.0].matches(&selector))
            .collect())
    }


    /*
     * Paths
     */

    /// Resolves a section path without creating anything.
    ///
    /// Fails with [`ConfiguratorError::PathNotFound`] carrying the longest
    /// resolvable prefix and the unresolved rest, or with
    /// [`ConfiguratorError::NotASection`] if a segment names an option.
    pub fn resolve_section_path(&mut self, path: &str) -> Result<SectionId> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;

        let segments = path::split_path(path)?;
        let selectors = parse_selectors(path, &segments)?;

        match self.resolve(path, &segments, &selectors)? {
            Resolution::Found(section) => Ok(section),
            Resolution::Missing { resolved, .. } => {
                let valid_prefix = match resolved {
                    0 => "",
                    count => &path[..segments[count - 1].end],
                };

                Err(ConfiguratorError::PathNotFound {
                    valid_prefix: valid_prefix.to_string(),
                    remainder: path[segments[resolved].start..].to_string(),
                })
            }
        }
    }

    /// Resolves a section path, creating whatever part of it is missing.
    ///
    /// Creation resumes below the longest existing prefix, so calling this
    /// twice with the same path yields the same section.
    pub fn ensure_section_path(&mut self, path: &str) -> Result<SectionId> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;

        let segments = path::split_path(path)?;
        let mut selectors = parse_selectors(path, &segments)?;

        let (deepest, resolved) = match self.resolve(path, &segments, &selectors)? {
            Resolution::Found(section) => return Ok(section),
            Resolution::Missing { deepest, resolved } => (deepest, resolved),
        };

        debug!(
            "Creating `{}` below `{}`.",
            &path[segments[resolved].start..],
            deepest.map(|id| self.describe(id)).unwrap_or_default()
        );

        let missing = selectors.split_off(resolved);
        let (first, last) = self.create_chain(deepest, missing)?;
        self.trigger_update(first)?;

        Ok(last)
    }

    fn resolve(
        &self,
        path: &str,
        segments: &[PathSegment],
        selectors: &[SectionSelector],
    ) -> Result<Resolution> {
        let mut current: Option<SectionId> = None;

        for (index, selector) in selectors.iter().enumerate() {
            let candidates = match current {
                Some(section) => &self.sections[section.0].sub_sections,
                None => &self.top_level_sections,
            };

            match self.first_match(candidates, selector) {
                Some(next) => current = Some(next),
                None => {
                    if let Some(section) = current {
                        let is_option = selector.attributes().is_empty()
                            && self.sections[section.0].option(selector.name()).is_some();

                        if is_option {
                            return Err(ConfiguratorError::NotASection {
                                path: path[..segments[index].end].to_string(),
                                option: selector.name().to_string(),
                            });
                        }
                    }

                    debug!("`{path}` does not resolve past segment {index}.");
                    return Ok(Resolution::Missing {
                        deepest: current,
                        resolved: index,
                    });
                }
            }
        }

        // PANIC SAFETY: paths always have at least one segment.
        Ok(Resolution::Found(current.unwrap()))
    }

    fn first_match(&self, candidates: &[SectionId], selector: &SectionSelector) -> Option<SectionId> {
        candidates
            .iter()
            .copied()
            .find(|id| self.sections[id.0].matches(selector))
    }

    /// Appends one new section per selector, each below the previous one.
    /// Returns the first and the last created section. Does not persist.
    fn create_chain(
        &mut self,
        parent: Option<SectionId>,
        selectors: Vec<SectionSelector>,
    ) -> Result<(SectionId, SectionId)> {
        let mut created: Option<(SectionId, SectionId)> = None;
        let mut parent = parent;

        for selector in selectors {
            let section = self.insert_section(selector, parent);
            info!("Added section {}.", self.describe(section));

            created = Some(match created {
                Some((first, _)) => (first, section),
                None => (section, section),
            });
            parent = Some(section);
        }

        created.ok_or_else(|| ConfiguratorError::malformed("", 0, 0, "empty path"))
    }

    fn insert_section(&mut self, selector: SectionSelector, parent: Option<SectionId>) -> SectionId {
        let (name, attributes) = selector.into_parts();

        let section = SectionId(self.sections.len());
        self.sections.push(SectionNode::new(name, parent, attributes));

        match parent {
            Some(parent) => self.sections[parent.0].sub_sections.push(section),
            None => self.top_level_sections.push(section),
        }

        section
    }


    /*
     * Options
     */

    /// Sets option `name` of `section`: the first option of that name is
    /// overwritten, otherwise a new option is appended. Writes through.
    pub fn set_option(&mut self, section: SectionId, name: &str, value: &str) -> Result<&ConfigOption> {
        let _log = self.logger.enter();
        self.ensure_document_exists()?;
        path::validate_option_name(name, 0, name)?;
        path::validate_value(value)?;

        let node = self.node_mut(section)?;
        let index = match node.option_index(name) {
            Some(index) => {
                node.options[index].set_value(value.to_string());
                index
            }
            None => {
                node.options
                    .push(ConfigOption::new(name.to_string(), value.to_string(), section));
                node.options.len() - 1
            }
        };

        debug!("Set {}.{name} = {value}.", self.describe(section));
        self.trigger_update(section)?;

        Ok(&self.sections[section.0].options[index])
    }

    /// Sets an option by its full path (`Section.SubSection.option`),
    /// creating missing sections on the way.
    pub fn add_option_by_path(&mut self, path: &str, value: &str) -> Result<&ConfigOption> {
        let _log = self.logger.enter();

        let (segments, option) = path::split_option_path(path)?;
        let section_path = &path[..segments[segments.len() - 1].end];

        // Checked before any section on the way is created.
        path::validate_value(value)?;

        let section = self.ensure_section_path(section_path)?;
        self.set_option(section, option.text(path), value)
    }

    /// Looks up an option by its full path. Creates nothing.
    pub fn get_option_by_path(&mut self, path: &str) -> Result<&ConfigOption> {
        let _log = self.logger.enter();

        let (segments, option) = path::split_option_path(path)?;
        let section_path = &path[..segments[segments.len() - 1].end];
        let option_name = option.text(path);

        let section = self.resolve_section_path(section_path)?;

        self.sections[section.0]
            .option(option_name)
            .ok_or_else(|| ConfiguratorError::OptionNotFound {
                section: section_path.to_string(),
                option: option_name.to_string(),
            })
    }


    /*
     * Helpers
     */

    fn node(&self, section: SectionId) -> Result<&SectionNode> {
        self.sections
            .get(section.0)
            .ok_or(ConfiguratorError::UnknownSection(section))
    }

    fn node_mut(&mut self, section: SectionId) -> Result<&mut SectionNode> {
        self.sections
            .get_mut(section.0)
            .ok_or(ConfiguratorError::UnknownSection(section))
    }

    fn describe(&self, section: SectionId) -> String {
        self.section(section)
            .map(|section| section.to_string())
            .unwrap_or_default()
    }
}

/// Configurators are equal when they are backed by the same location.
impl PartialEq for Configurator {
    fn eq(&self, other: &Self) -> bool {
        self.file_path() == other.file_path()
    }
}

impl Debug for Configurator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configurator")
            .field("file_path", &self.file_path())
            .field("scope", &self.scope)
            .field("loaded", &self.document.is_some())
            .field("sections", &self.sections.len())
            .finish()
    }
}


fn parse_selectors(path: &str, segments: &[PathSegment]) -> Result<Vec<SectionSelector>> {
    segments
        .iter()
        .map(|segment| SectionSelector::parse_in(path, *segment))
        .collect()
}

/// Global paths are used as given, local ones are placed under the home directory.
fn resolve_file_path(path: &Path, scope: Scope) -> Result<PathBuf, StoreError> {
    match scope {
        Scope::Global => match path.strip_prefix("~") {
            Ok(relative) => Ok(home_directory()?.join(relative)),
            Err(_) => Ok(path.to_path_buf()),
        },
        Scope::Local => Ok(home_directory()?.join(path)),
    }
}

fn home_directory() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeDirectoryUnavailable)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryStore;

    fn configurator() -> Configurator {
        Configurator::with_store(MemoryStore::new("memory"), Logger::disabled())
    }

    #[test]
    fn global_paths_are_used_as_given() {
        let path = Path::new("/etc/configurator/config.xml");
        assert_eq!(resolve_file_path(path, Scope::Global).unwrap(), path);
    }

    #[test]
    fn local_paths_live_under_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        assert_eq!(
            resolve_file_path(Path::new(".configurator.xml"), Scope::Local).unwrap(),
            home.join(".configurator.xml")
        );
        assert_eq!(
            resolve_file_path(Path::new("~/config.xml"), Scope::Global).unwrap(),
            home.join("config.xml")
        );
    }

    #[test]
    fn materializing_a_child_materializes_its_parents_first() {
        let mut configurator = configurator();
        configurator.ensure_document_exists().unwrap();

        let parent = configurator.insert_section(SectionSelector::parse("Parent").unwrap(), None);
        let child = configurator.insert_section(
            SectionSelector::parse("Child[kind=leaf]").unwrap(),
            Some(parent),
        );

        let child_element = configurator.get_element(child).unwrap();
        let parent_element = match configurator.section(parent).unwrap().materialization() {
            Materialization::Materialized(element) => element,
            Materialization::Unmaterialized => panic!("parent was not materialized"),
        };

        let document = configurator.document().unwrap();
        assert_eq!(document.element(child_element).parent(), Some(parent_element));
        assert_eq!(document.element(parent_element).parent(), Some(document.root()));
        assert_eq!(document.element(child_element).attribute("kind"), Some("leaf"));

        // Materialization happens at most once.
        assert_eq!(configurator.get_element(child).unwrap(), child_element);
    }

    #[test]
    fn invalidation_detaches_and_rematerializes_the_subtree() {
        let mut configurator = configurator();
        let option = configurator
            .add_option_by_path("Outer.Inner.flag", "on")
            .unwrap()
            .clone();
        let outer = configurator.resolve_section_path("Outer").unwrap();
        let inner = option.section();

        let old_element = configurator.get_element(outer).unwrap();
        configurator.invalidate_element(outer).unwrap();

        assert_eq!(
            configurator.section(inner).unwrap().materialization(),
            Materialization::Unmaterialized
        );
        assert!(!configurator.document().unwrap().is_attached(old_element));

        configurator.trigger_update(outer).unwrap();

        let new_element = configurator.get_element(outer).unwrap();
        assert_ne!(new_element, old_element);

        let document = configurator.document().unwrap();
        assert!(document.is_attached(new_element));
        assert_eq!(document.element(document.root()).children(), &[new_element]);

        let inner_element = configurator.get_element(inner).unwrap();
        let document = configurator.document().unwrap();
        let option_elements = document
            .children_by_tag(inner_element, OPTION_TAG)
            .collect::<Vec<_>>();
        assert_eq!(option_elements.len(), 1);
        assert_eq!(document.element(option_elements[0]).text(), Some("on"));
    }

    #[test]
    fn persist_rematerializes_invalidated_sections() {
        let mut configurator = configurator();
        let section = configurator.ensure_section_path("Kept").unwrap();
        configurator.invalidate_element(section).unwrap();

        configurator.persist().unwrap();

        let document = configurator.document().unwrap();
        assert_eq!(document.children_by_tag(document.root(), "Kept").count(), 1);
    }

    #[test]
    fn unknown_section_ids_are_rejected() {
        let mut configurator = configurator();
        configurator.ensure_document_exists().unwrap();

        assert!(configurator.section(SectionId(42)).is_none());
        assert!(matches!(
            configurator.set_option(SectionId(42), "a", "b"),
            Err(ConfiguratorError::UnknownSection(SectionId(42)))
        ));
    }
}
