// src/common/status_machine.rs

use crate::common::error::AppError;

/// Máquina de status genérica, dirigida por uma tabela fixa de transições.
/// Cada enum de status (contrato, fatura) declara sua própria tabela.
pub trait StatusMachine: Copy + PartialEq + Sized + 'static {
    /// Pares (de, para) permitidos. A auto-transição (x -> x) é sempre
    /// permitida e não precisa constar na tabela.
    const TRANSITIONS: &'static [(Self, Self)];

    /// Rótulo do status no formato do banco/da API (maiúsculas).
    fn as_str(&self) -> &'static str;

    fn can_transition(&self, target: Self) -> bool {
        if *self == target {
            return true;
        }
        Self::TRANSITIONS
            .iter()
            .any(|&(from, to)| from == *self && to == target)
    }

    /// Terminal = nenhuma aresta de saída na tabela.
    fn is_terminal(&self) -> bool {
        !Self::TRANSITIONS.iter().any(|&(from, _)| from == *self)
    }

    /// Valida a transição ANTES de qualquer escrita no banco.
    /// O servidor continua sendo a autoridade final: uma leitura desatualizada
    /// pode passar aqui e ainda ser rejeitada na escrita condicional.
    fn assert_transition(&self, target: Self) -> Result<(), AppError> {
        if self.can_transition(target) {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                from: self.as_str(),
                to: target.as_str(),
            })
        }
    }

    /// Rejeita qualquer mutação sobre um registro em status terminal.
    fn assert_mutable(&self) -> Result<(), AppError> {
        if self.is_terminal() {
            Err(AppError::TerminalState {
                status: self.as_str(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Semaforo {
        Verde,
        Amarelo,
        Vermelho,
    }

    impl StatusMachine for Semaforo {
        const TRANSITIONS: &'static [(Self, Self)] = &[
            (Semaforo::Verde, Semaforo::Amarelo),
            (Semaforo::Amarelo, Semaforo::Vermelho),
        ];

        fn as_str(&self) -> &'static str {
            match self {
                Semaforo::Verde => "VERDE",
                Semaforo::Amarelo => "AMARELO",
                Semaforo::Vermelho => "VERMELHO",
            }
        }
    }

    #[test]
    fn auto_transicao_sempre_permitida() {
        assert!(Semaforo::Vermelho.can_transition(Semaforo::Vermelho));
        assert!(Semaforo::Verde.can_transition(Semaforo::Verde));
    }

    #[test]
    fn transicao_fora_da_tabela_rejeitada() {
        assert!(!Semaforo::Verde.can_transition(Semaforo::Vermelho));
        let err = Semaforo::Verde
            .assert_transition(Semaforo::Vermelho)
            .unwrap_err();
        match err {
            AppError::InvalidTransition { from, to } => {
                assert_eq!(from, "VERDE");
                assert_eq!(to, "VERMELHO");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn terminal_nao_tem_saida() {
        assert!(Semaforo::Vermelho.is_terminal());
        assert!(!Semaforo::Amarelo.is_terminal());
        assert!(Semaforo::Vermelho.assert_mutable().is_err());
    }
}
