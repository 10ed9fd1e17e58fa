use crate::runtime::event::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Action(Action),
    RequestRender,
}
